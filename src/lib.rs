//! # PMQ - POSIX Message Queue Handles
//!
//! Safe, resource-scoped access to the kernel's named, persistent,
//! priority-ordered message queues (`mq_open`, `mq_send`, `mq_receive`,
//! `mq_getattr`, `mq_close`, `mq_unlink`).
//!
//! ## What the Library Does
//!
//! - **Flag composition**: access mode, creation and exclusivity are expressed
//!   through [`QueueOptions`] instead of raw bit-fields
//! - **Deadlines**: relative timeouts are converted to the absolute deadlines the
//!   timed kernel calls require, fresh for every call
//! - **Typed errors**: failures are classified into [`MqError::Timeout`] or
//!   [`MqError::Queue`] with the errno and its symbolic name
//! - **Lifetime**: a creating handle unlinks its queue on release unless told
//!   to persist it
//!
//! The kernel remains responsible for storage, blocking and priority order.
//!
//! ## Architecture Overview
//!
//! - `error`: error classification and the crate error type
//! - `timeout`: absolute deadline construction
//! - `limits`: system-wide default limits
//! - `queue`: names, options, attributes, the handle and its draining iterator
//! - `async_queue`: Tokio adapter running queue calls on the blocking pool
//! - `cli`, `logging`, `utils`: support for the `pmq` command-line tool
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use pmq::{MessageQueue, QueueOptions};
//!
//! # fn main() -> pmq::Result<()> {
//! let mut writer = MessageQueue::open("events", &QueueOptions::new().create(true))?;
//! writer.send(b"hello", 0)?;
//!
//! let mut reader = MessageQueue::open_reader("events")?;
//! assert_eq!(reader.receive()?, b"hello");
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! A handle is driven by one thread at a time (`send`/`receive` take
//! `&mut self`). Independent handles on the same name, in this or other
//! processes, may be used concurrently; the kernel serializes access.
//! Length and full/empty queries are best-effort snapshots.

/// Tokio adapter over the blocking handle
pub mod async_queue;

/// Command-line interface for the `pmq` binary
pub mod cli;

/// Error classification and the crate error type
///
/// Maps raw `errno` values into `Timeout` or a `Queue` error carrying the
/// numeric code and symbolic name.
pub mod error;

/// System-wide limits used as creation defaults
pub mod limits;

pub mod logging;

/// Message queue handles
///
/// Contains `MessageQueue`, its open options, attribute snapshots, name
/// normalization and the draining iterator.
pub mod queue;

/// Absolute deadlines for timed calls
pub mod timeout;

pub mod utils;

pub use async_queue::AsyncMessageQueue;
pub use error::{classify, classify_raw, MqError, Operation, Result};
pub use limits::{LimitsProvider, ProcLimits, SystemLimits};
pub use queue::{
    unlink, AccessMode, Drain, MessageQueue, QueueAttributes, QueueConfig, QueueName, QueueOptions,
};
pub use timeout::Deadline;

/// The current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Permission bits for newly created queues (owner read/write, others read)
    pub const PERMISSIONS: u32 = 0o644;

    /// Priority used when the caller does not choose one
    pub const PRIORITY: u32 = 0;

    /// Directory publishing the system-wide limits on Linux
    pub const PROC_LIMITS_DIR: &str = "/proc/sys/fs/mqueue";
}
