use super::attributes::QueueAttributes;
use super::drain::Drain;
use super::name::QueueName;
use super::options::{AccessMode, QueueOptions};
use super::sys;
use crate::error::{classify, MqError, Operation, Result};
use crate::limits::{LimitsProvider, ProcLimits};
use crate::timeout::Deadline;
use nix::errno::Errno;
use nix::mqueue::MqdT;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

/// An open handle to a named POSIX message queue
///
/// The handle owns its descriptor exclusively. Sending and receiving take
/// `&mut self`, so one handle cannot be driven from two threads at once;
/// open a second handle on the same name for concurrent use.
///
/// Release is deterministic: [`MessageQueue::close`] closes the descriptor
/// and, for a creator that does not persist, unlinks the name, returning any
/// failure. Dropping an unclosed handle performs the same teardown and logs
/// failures instead.
pub struct MessageQueue {
    name: QueueName,
    mode: AccessMode,
    is_creator: bool,
    persist: bool,
    max_message_size: usize,
    max_messages: usize,
    mqd: Option<MqdT>,
}

impl MessageQueue {
    /// Open a queue, taking default limits from `/proc/sys/fs/mqueue`
    pub fn open(name: impl Into<QueueName>, options: &QueueOptions) -> Result<Self> {
        Self::open_with_limits(name, options, &ProcLimits::default())
    }

    /// Open a queue, taking default limits from `limits`
    ///
    /// When `options.create` is set the queue is created with the resolved
    /// limits (an existing queue of the same name is opened as-is unless
    /// `exclusive` is also set). Otherwise the queue must already exist. In
    /// every case the handle adopts the limits the kernel reports for the
    /// queue it ended up with.
    pub fn open_with_limits(
        name: impl Into<QueueName>,
        options: &QueueOptions,
        limits: &dyn LimitsProvider,
    ) -> Result<Self> {
        let name = name.into();

        let mqd = if options.create {
            let config = options.resolve(limits)?;
            sys::create(&name, &config)?
        } else {
            sys::open_existing(&name, options.open_flags())?
        };

        // The requested limits only apply when the kernel created the queue
        // just now, so always take the ones it reports.
        let (max_messages, max_message_size) = match sys::get_attributes(&mqd) {
            Ok(attrs) => (attrs.max_messages, attrs.max_message_size),
            Err(e) => {
                if let Err(close_err) = sys::close(mqd) {
                    error!("Failed to close '{}' after open failed: {}", name, close_err);
                }
                return Err(e);
            }
        };

        debug!(
            "Opened message queue '{}' ({:?}, creator: {}, max_messages: {}, max_message_size: {})",
            name, options.mode, options.create, max_messages, max_message_size
        );

        Ok(Self {
            name,
            mode: options.mode,
            is_creator: options.create,
            persist: options.persist,
            max_message_size,
            max_messages,
            mqd: Some(mqd),
        })
    }

    /// Create a read-write queue with system default limits
    ///
    /// The queue is unlinked when this handle is released.
    pub fn create(name: impl Into<QueueName>) -> Result<Self> {
        Self::open(name, &QueueOptions::new().create(true))
    }

    /// Open an existing queue for receiving only
    pub fn open_reader(name: impl Into<QueueName>) -> Result<Self> {
        Self::open(name, &QueueOptions::new().mode(AccessMode::Read))
    }

    /// Open an existing queue for sending only
    pub fn open_writer(name: impl Into<QueueName>) -> Result<Self> {
        Self::open(name, &QueueOptions::new().mode(AccessMode::Write))
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn is_creator(&self) -> bool {
        self.is_creator
    }

    pub fn persists(&self) -> bool {
        self.persist
    }

    /// Choose whether the named queue outlives this handle
    ///
    /// Only meaningful for the creator; other handles never unlink.
    pub fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    fn descriptor(&self, op: Operation) -> Result<&MqdT> {
        self.mqd.as_ref().ok_or_else(|| classify(op, Errno::EBADF))
    }

    /// Send a message, blocking while the queue is full
    ///
    /// Payloads longer than the queue's message size fail with `EMSGSIZE`.
    /// Higher priorities are received first.
    pub fn send(&mut self, data: &[u8], priority: u32) -> Result<()> {
        sys::send(self.descriptor(Operation::Send)?, data, priority)?;
        debug!("Sent {} bytes to '{}' at priority {}", data.len(), self.name, priority);
        Ok(())
    }

    /// Send a message, waiting at most `timeout` (whole seconds) for room
    ///
    /// Fails with [`MqError::Timeout`] if the queue is still full when the
    /// deadline passes. A zero timeout never blocks.
    pub fn send_timeout(&mut self, data: &[u8], priority: u32, timeout: Duration) -> Result<()> {
        let mqd = self.descriptor(Operation::Send)?;
        sys::timed_send(mqd, data, priority, Deadline::after(timeout))?;
        debug!("Sent {} bytes to '{}' at priority {}", data.len(), self.name, priority);
        Ok(())
    }

    /// Receive the highest-priority message, blocking while the queue is empty
    ///
    /// The message's priority is not reported.
    pub fn receive(&mut self) -> Result<Vec<u8>> {
        let mut buffer = self.receive_buffer();
        let received = sys::receive(self.descriptor(Operation::Receive)?, &mut buffer)?;
        Ok(self.finish_receive(buffer, received))
    }

    /// Receive the highest-priority message, waiting at most `timeout` (whole seconds)
    ///
    /// Fails with [`MqError::Timeout`] if the queue is still empty when the
    /// deadline passes.
    pub fn receive_timeout(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        let mut buffer = self.receive_buffer();
        let mqd = self.descriptor(Operation::Receive)?;
        let received = sys::timed_receive(mqd, &mut buffer, Deadline::after(timeout))?;
        Ok(self.finish_receive(buffer, received))
    }

    /// Receive a message only if one is immediately available
    ///
    /// `Ok(None)` means the queue was empty at the time of the call. A
    /// returned message has been removed from the queue.
    pub fn try_receive(&mut self) -> Result<Option<Vec<u8>>> {
        match self.receive_timeout(Duration::ZERO) {
            Ok(message) => Ok(Some(message)),
            Err(MqError::Timeout) => Ok(None),
            // Handles opened with O_NONBLOCK report an empty queue this way
            Err(MqError::Queue { code, .. }) if code == Errno::EAGAIN as i32 => Ok(None),
            Err(e) => Err(e),
        }
    }

    // One spare byte beyond the configured maximum.
    fn receive_buffer(&self) -> Vec<u8> {
        vec![0u8; self.max_message_size + 1]
    }

    fn finish_receive(&self, mut buffer: Vec<u8>, received: usize) -> Vec<u8> {
        buffer.truncate(received);
        debug!("Received {} bytes from '{}'", received, self.name);
        buffer
    }

    /// Read the queue's current attributes
    pub fn attributes(&self) -> Result<QueueAttributes> {
        sys::get_attributes(self.descriptor(Operation::GetAttributes)?)
    }

    /// Number of messages currently in the queue (best-effort snapshot)
    pub fn len(&self) -> Result<usize> {
        Ok(self.attributes()?.current_messages)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn is_full(&self) -> Result<bool> {
        Ok(self.len()? == self.max_messages)
    }

    /// Iterate over the messages that are immediately available
    ///
    /// Every yielded message is removed from the queue. The iterator ends the
    /// first time the queue is found empty, or after yielding an error.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain::new(self)
    }

    /// Close the descriptor and, for a non-persistent creator, unlink the name
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    // Unlink is attempted even if close fails; the close error wins.
    fn release(&mut self) -> Result<()> {
        let Some(mqd) = self.mqd.take() else {
            return Ok(());
        };

        let closed = sys::close(mqd);
        match &closed {
            Ok(()) => debug!("Closed message queue '{}'", self.name),
            Err(e) => debug!("Failed to close message queue '{}': {}", self.name, e),
        }

        let unlinked = if self.is_creator && !self.persist {
            let result = unlink(&self.name);
            if result.is_ok() {
                debug!("Unlinked message queue '{}'", self.name);
            }
            result
        } else {
            Ok(())
        };

        closed.and(unlinked)
    }
}

impl fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageQueue")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("is_creator", &self.is_creator)
            .field("persist", &self.persist)
            .field("max_message_size", &self.max_message_size)
            .field("max_messages", &self.max_messages)
            .field("open", &self.mqd.is_some())
            .finish()
    }
}

impl Drop for MessageQueue {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            error!("Failed to release message queue '{}': {}", self.name, e);
        }
    }
}

impl<'a> IntoIterator for &'a mut MessageQueue {
    type Item = Result<Vec<u8>>;
    type IntoIter = Drain<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.drain()
    }
}

/// Remove a named queue from the system namespace
///
/// Open handles keep working; the queue is destroyed once the last one closes.
pub fn unlink(name: impl Into<QueueName>) -> Result<()> {
    sys::unlink(&name.into())
}
