//! Send/receive behaviour against the kernel's POSIX message queues.
//!
//! Every test creates its own uniquely named queue and skips when the host
//! has no usable mqueue support.

mod common;

use common::{create_small_queue, mqueue_available, MAX_MESSAGES, MAX_MESSAGE_SIZE};
use pmq::{MessageQueue, MqError};
use std::time::{Duration, Instant};

#[test]
fn messages_up_to_max_size_are_accepted() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    let max = queue.max_message_size();
    assert_eq!(max, MAX_MESSAGE_SIZE);

    queue.send(&vec![b'a'; max], 0).unwrap();

    let err = queue.send(&vec![b'a'; max + 1], 0).unwrap_err();
    assert!(!err.is_timeout());
    assert_eq!(err.symbolic_name(), Some("EMSGSIZE"));

    assert_eq!(queue.receive().unwrap(), vec![b'a'; max]);
    queue.close().unwrap();
}

#[test]
fn length_empty_and_full_track_sends() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();

    assert!(queue.is_empty().unwrap());
    assert!(!queue.is_full().unwrap());
    assert_eq!(queue.len().unwrap(), 0);

    for n in 0..queue.max_messages() {
        queue.send(b"a", 0).unwrap();
        assert!(!queue.is_empty().unwrap());
        assert_eq!(queue.len().unwrap(), n + 1);
    }
    assert!(queue.is_full().unwrap());

    let attributes = queue.attributes().unwrap();
    assert_eq!(attributes.current_messages, MAX_MESSAGES);
    assert_eq!(attributes.max_messages, MAX_MESSAGES);
    assert_eq!(attributes.max_message_size, MAX_MESSAGE_SIZE);
    queue.close().unwrap();
}

#[test]
fn received_payloads_match_sent_payloads() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    let payloads: Vec<Vec<u8>> = (0..queue.max_messages())
        .map(|i| (0..200).map(|j| (i * 31 + j * 7) as u8).collect())
        .collect();

    for payload in &payloads {
        queue.send(payload, 0).unwrap();
    }
    for payload in &payloads {
        assert_eq!(&queue.receive().unwrap(), payload);
    }
    queue.close().unwrap();
}

#[test]
fn empty_payload_round_trips() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    queue.send(b"", 0).unwrap();
    assert_eq!(queue.len().unwrap(), 1);
    assert!(queue.receive().unwrap().is_empty());
    queue.close().unwrap();
}

#[test]
fn higher_priority_is_received_first() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    queue.send(b"a", 1).unwrap();
    queue.send(b"b", 8).unwrap();
    queue.send(b"c", 5).unwrap();

    assert_eq!(queue.receive().unwrap(), b"b");
    assert_eq!(queue.receive().unwrap(), b"c");
    assert_eq!(queue.receive().unwrap(), b"a");
    queue.close().unwrap();
}

#[test]
fn equal_priorities_are_first_in_first_out() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    queue.send(b"first", 3).unwrap();
    queue.send(b"second", 3).unwrap();
    queue.send(b"urgent", 4).unwrap();

    assert_eq!(queue.receive().unwrap(), b"urgent");
    assert_eq!(queue.receive().unwrap(), b"first");
    assert_eq!(queue.receive().unwrap(), b"second");
    queue.close().unwrap();
}

#[test]
fn send_times_out_on_full_queue() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    for _ in 0..queue.max_messages() {
        queue.send(b"a", 0).unwrap();
    }

    // Deadlines have whole-second resolution, so a two second timeout waits
    // for more than one second.
    let start = Instant::now();
    let err = queue
        .send_timeout(b"a", 0, Duration::from_secs(2))
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, MqError::Timeout), "unexpected error: {:?}", err);
    assert!(elapsed >= Duration::from_millis(900), "returned after {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "returned after {:?}", elapsed);
    assert_eq!(queue.len().unwrap(), MAX_MESSAGES);
    queue.close().unwrap();
}

#[test]
fn receive_times_out_on_empty_queue() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();

    let start = Instant::now();
    let err = queue.receive_timeout(Duration::from_secs(2)).unwrap_err();
    let elapsed = start.elapsed();

    assert!(err.is_timeout(), "unexpected error: {:?}", err);
    assert!(elapsed >= Duration::from_millis(900), "returned after {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "returned after {:?}", elapsed);
    queue.close().unwrap();
}

#[test]
fn zero_timeout_send_succeeds_when_there_is_room() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    queue.send_timeout(b"now", 2, Duration::ZERO).unwrap();
    assert_eq!(queue.receive_timeout(Duration::ZERO).unwrap(), b"now");
    queue.close().unwrap();
}

#[test]
fn try_receive_reports_empty_queue_as_none() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    assert_eq!(queue.try_receive().unwrap(), None);

    queue.send(b"x", 0).unwrap();
    assert_eq!(queue.try_receive().unwrap(), Some(b"x".to_vec()));
    assert_eq!(queue.try_receive().unwrap(), None);
    queue.close().unwrap();
}

#[test]
fn drain_yields_messages_in_priority_order_then_stops() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    queue.send(b"x", 0).unwrap();
    queue.send(b"y", 0).unwrap();

    let drained: Vec<Vec<u8>> = queue.drain().collect::<Result<_, _>>().unwrap();
    assert_eq!(drained, vec![b"x".to_vec(), b"y".to_vec()]);
    assert!(queue.is_empty().unwrap());

    // Nothing is replayed
    assert_eq!(queue.drain().count(), 0);

    queue.send(b"low", 1).unwrap();
    queue.send(b"high", 6).unwrap();
    let mut seen = Vec::new();
    for message in &mut queue {
        seen.push(message.unwrap());
    }
    assert_eq!(seen, vec![b"high".to_vec(), b"low".to_vec()]);
    queue.close().unwrap();
}

#[test]
fn drain_is_fused_after_end() {
    if !mqueue_available() {
        return;
    }
    let mut queue = create_small_queue();
    let mut drain = queue.drain();
    assert!(drain.next().is_none());
    assert!(drain.next().is_none());
    drop(drain);
    queue.close().unwrap();
}

#[test]
fn drain_stops_after_reporting_an_error() {
    if !mqueue_available() {
        return;
    }
    let owner = create_small_queue();
    let mut writer = MessageQueue::open_writer(owner.name()).unwrap();

    let mut drain = writer.drain();
    match drain.next() {
        Some(Err(e)) => assert_eq!(e.symbolic_name(), Some("EBADF")),
        other => panic!("expected EBADF, got {:?}", other),
    }
    assert!(drain.next().is_none());
    assert!(drain.next().is_none());
    drop(drain);

    writer.close().unwrap();
    owner.close().unwrap();
}
