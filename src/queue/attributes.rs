use nix::mqueue::{MqAttr, MQ_OFlag};
use serde::{Deserialize, Serialize};

/// Point-in-time view of a queue's attributes
///
/// Each snapshot is read fresh from the kernel. Concurrent senders and
/// receivers can change the message count the moment after it is read, so
/// treat `current_messages` as best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueAttributes {
    pub flags: i64,
    pub max_messages: usize,
    pub max_message_size: usize,
    pub current_messages: usize,
}

impl QueueAttributes {
    pub fn is_empty(&self) -> bool {
        self.current_messages == 0
    }

    pub fn is_full(&self) -> bool {
        self.current_messages == self.max_messages
    }

    pub fn is_nonblocking(&self) -> bool {
        self.flags & i64::from(MQ_OFlag::O_NONBLOCK.bits()) != 0
    }
}

impl From<&MqAttr> for QueueAttributes {
    fn from(attr: &MqAttr) -> Self {
        Self {
            flags: attr.flags() as i64,
            max_messages: attr.maxmsg() as usize,
            max_message_size: attr.msgsize() as usize,
            current_messages: attr.curmsgs() as usize,
        }
    }
}
