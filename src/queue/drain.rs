use super::handle::MessageQueue;
use crate::error::Result;
use std::iter::FusedIterator;

/// Iterator that receives messages until the queue is empty
///
/// Created by [`MessageQueue::drain`]. Each step is a non-blocking receive, so
/// the sequence reflects the queue as it is at that moment. Messages sent
/// while draining may be picked up too, and nothing is replayed once taken.
#[derive(Debug)]
pub struct Drain<'a> {
    queue: &'a mut MessageQueue,
    finished: bool,
}

impl<'a> Drain<'a> {
    pub(crate) fn new(queue: &'a mut MessageQueue) -> Self {
        Self {
            queue,
            finished: false,
        }
    }
}

impl Iterator for Drain<'_> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.queue.try_receive() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Drain<'_> {}
