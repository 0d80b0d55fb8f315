#![allow(dead_code)]

use pmq::utils::generate_queue_name;
use pmq::{MessageQueue, QueueOptions};

/// Small limits keep every test queue well under RLIMIT_MSGQUEUE even when
/// the whole suite runs in parallel.
pub const MAX_MESSAGES: usize = 4;
pub const MAX_MESSAGE_SIZE: usize = 256;

/// POSIX queues need a kernel with CONFIG_POSIX_MQUEUE and a permissive
/// sandbox. Check once per test and skip when unavailable.
pub fn mqueue_available() -> bool {
    let name = generate_queue_name("pmq_check");
    let options = QueueOptions::new()
        .create(true)
        .max_messages(1)
        .max_message_size(16);
    match MessageQueue::open(&name, &options) {
        Ok(queue) => queue.close().is_ok(),
        Err(e) => {
            eprintln!("Skipping: POSIX message queues unavailable here: {}", e);
            false
        }
    }
}

pub fn small_queue_options() -> QueueOptions {
    QueueOptions::new()
        .create(true)
        .exclusive(true)
        .max_messages(MAX_MESSAGES)
        .max_message_size(MAX_MESSAGE_SIZE)
}

/// Create a uniquely named, non-persistent queue with small limits
pub fn create_small_queue() -> MessageQueue {
    MessageQueue::open(generate_queue_name("pmq_test"), &small_queue_options())
        .expect("create test queue")
}
