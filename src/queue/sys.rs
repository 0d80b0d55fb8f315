//! Narrow boundary to the kernel message-queue calls.
//!
//! Each function issues exactly one call and returns either its success value
//! or an already-classified [`MqError`]. The untimed calls go through
//! `nix::mqueue`; the timed variants go through `libc` with a [`Deadline`]
//! built by the caller immediately beforehand.

use super::attributes::QueueAttributes;
use super::name::QueueName;
use super::options::QueueConfig;
use crate::error::{classify, Operation, Result};
use crate::timeout::Deadline;
use nix::errno::Errno;
use nix::mqueue::{mq_close, mq_getattr, mq_open, mq_receive, mq_send, mq_unlink, MQ_OFlag, MqAttr, MqdT};
use nix::sys::stat::Mode;
use std::os::unix::io::AsRawFd;
use tracing::trace;

/// Create (or open, without `O_EXCL`) a queue with the given configuration
pub(crate) fn create(name: &QueueName, config: &QueueConfig) -> Result<MqdT> {
    let attr = MqAttr::new(
        0,
        config.max_messages as i64,
        config.max_message_size as i64,
        0,
    );
    mq_open(name.as_str(), config.flags, config.permissions, Some(&attr))
        .map_err(|e| classify(Operation::Open, e))
}

/// Open an existing queue without supplying a configuration
pub(crate) fn open_existing(name: &QueueName, flags: MQ_OFlag) -> Result<MqdT> {
    mq_open(name.as_str(), flags, Mode::empty(), None).map_err(|e| classify(Operation::Open, e))
}

pub(crate) fn send(mqd: &MqdT, data: &[u8], priority: u32) -> Result<()> {
    mq_send(mqd, data, priority).map_err(|e| classify(Operation::Send, e))
}

pub(crate) fn timed_send(mqd: &MqdT, data: &[u8], priority: u32, deadline: Deadline) -> Result<()> {
    let deadline_ts = deadline.to_timespec();
    let abstime: &libc::timespec = deadline_ts.as_ref();
    trace!("Timed send with deadline {}", deadline.epoch_secs());
    // SAFETY: the pointer/length pair describes `data`, and `abstime` outlives the call.
    let res = unsafe {
        libc::mq_timedsend(
            mqd.as_raw_fd(),
            data.as_ptr().cast(),
            data.len(),
            priority,
            abstime,
        )
    };
    Errno::result(res)
        .map(drop)
        .map_err(|e| classify(Operation::Send, e))
}

/// Blocking receive into `buffer`, returning the number of bytes written
pub(crate) fn receive(mqd: &MqdT, buffer: &mut [u8]) -> Result<usize> {
    let mut priority = 0u32;
    mq_receive(mqd, buffer, &mut priority).map_err(|e| classify(Operation::Receive, e))
}

pub(crate) fn timed_receive(mqd: &MqdT, buffer: &mut [u8], deadline: Deadline) -> Result<usize> {
    let deadline_ts = deadline.to_timespec();
    let abstime: &libc::timespec = deadline_ts.as_ref();
    let mut priority: libc::c_uint = 0;
    trace!("Timed receive with deadline {}", deadline.epoch_secs());
    // SAFETY: the pointer/length pair describes `buffer`, and both `priority`
    // and `abstime` outlive the call.
    let res = unsafe {
        libc::mq_timedreceive(
            mqd.as_raw_fd(),
            buffer.as_mut_ptr().cast(),
            buffer.len(),
            &mut priority,
            abstime,
        )
    };
    Errno::result(res)
        .map(|received| received as usize)
        .map_err(|e| classify(Operation::Receive, e))
}

pub(crate) fn get_attributes(mqd: &MqdT) -> Result<QueueAttributes> {
    mq_getattr(mqd)
        .map(|attr| QueueAttributes::from(&attr))
        .map_err(|e| classify(Operation::GetAttributes, e))
}

pub(crate) fn close(mqd: MqdT) -> Result<()> {
    mq_close(mqd).map_err(|e| classify(Operation::Close, e))
}

pub(crate) fn unlink(name: &QueueName) -> Result<()> {
    mq_unlink(name.as_str()).map_err(|e| classify(Operation::Unlink, e))
}
