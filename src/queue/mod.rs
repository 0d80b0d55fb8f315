//! # POSIX Message Queue Handles
//!
//! A [`MessageQueue`] wraps one descriptor for a named kernel queue. The kernel
//! owns storage, blocking and priority ordering; this module composes the open
//! flags, turns relative timeouts into absolute deadlines, classifies failures
//! and ties the queue's lifetime to the handle that created it.
//!
//! ## Lifetime
//!
//! | Handle                     | On close / drop                 |
//! |----------------------------|---------------------------------|
//! | creator, `persist = false` | close descriptor, unlink name   |
//! | creator, `persist = true`  | close descriptor                |
//! | non-creator                | close descriptor                |
//!
//! ## Example
//!
//! ```rust,no_run
//! use pmq::{MessageQueue, QueueOptions};
//! use std::time::Duration;
//!
//! # fn main() -> pmq::Result<()> {
//! let mut queue = MessageQueue::open(
//!     "jobs",
//!     &QueueOptions::new().create(true).max_messages(8).max_message_size(1024),
//! )?;
//!
//! queue.send(b"low", 1)?;
//! queue.send(b"high", 9)?;
//! assert_eq!(queue.receive_timeout(Duration::from_secs(1))?, b"high");
//!
//! for message in queue.drain() {
//!     println!("{:?}", message?);
//! }
//! queue.close()?;
//! # Ok(())
//! # }
//! ```

mod attributes;
mod drain;
mod handle;
mod name;
mod options;
mod sys;

pub use attributes::QueueAttributes;
pub use drain::Drain;
pub use handle::{unlink, MessageQueue};
pub use name::QueueName;
pub use options::{AccessMode, QueueConfig, QueueOptions};
