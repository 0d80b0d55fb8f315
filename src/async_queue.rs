//! Tokio adapter for [`MessageQueue`].
//!
//! The kernel calls block the calling thread, so every operation runs on the
//! blocking pool via `spawn_blocking`. The handle sits behind a mutex shared by
//! all clones of an [`AsyncMessageQueue`]; calls on one handle are therefore
//! serialized. An untimed `receive` holds the lock until a message arrives, so
//! use a separate handle (or a timeout) when sending and receiving concurrently.

use crate::error::{classify, Operation, Result};
use crate::queue::{MessageQueue, QueueAttributes, QueueName, QueueOptions};
use nix::errno::Errno;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AsyncMessageQueue {
    name: QueueName,
    inner: Arc<Mutex<Option<MessageQueue>>>,
}

impl AsyncMessageQueue {
    pub fn new(queue: MessageQueue) -> Self {
        Self {
            name: queue.name().clone(),
            inner: Arc::new(Mutex::new(Some(queue))),
        }
    }

    /// Open a queue on the blocking pool
    pub async fn open(name: impl Into<QueueName>, options: QueueOptions) -> Result<Self> {
        let name = name.into();
        let queue =
            tokio::task::spawn_blocking(move || MessageQueue::open(name, &options)).await??;
        Ok(Self::new(queue))
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    async fn with_queue<T, F>(&self, op: Operation, f: F) -> Result<T>
    where
        F: FnOnce(&mut MessageQueue) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut guard = inner.lock();
            let queue = guard.as_mut().ok_or_else(|| classify(op, Errno::EBADF))?;
            f(queue)
        })
        .await?
    }

    /// Send a message; `None` blocks until there is room
    pub async fn send(&self, data: Vec<u8>, priority: u32, timeout: Option<Duration>) -> Result<()> {
        self.with_queue(Operation::Send, move |queue| match timeout {
            Some(timeout) => queue.send_timeout(&data, priority, timeout),
            None => queue.send(&data, priority),
        })
        .await
    }

    /// Receive a message; `None` blocks until one arrives
    pub async fn receive(&self, timeout: Option<Duration>) -> Result<Vec<u8>> {
        self.with_queue(Operation::Receive, move |queue| match timeout {
            Some(timeout) => queue.receive_timeout(timeout),
            None => queue.receive(),
        })
        .await
    }

    pub async fn try_receive(&self) -> Result<Option<Vec<u8>>> {
        self.with_queue(Operation::Receive, |queue| queue.try_receive())
            .await
    }

    pub async fn attributes(&self) -> Result<QueueAttributes> {
        self.with_queue(Operation::GetAttributes, |queue| queue.attributes())
            .await
    }

    pub async fn len(&self) -> Result<usize> {
        self.with_queue(Operation::GetAttributes, |queue| queue.len())
            .await
    }

    /// Release the underlying handle
    ///
    /// Clones that are still around see `EBADF` from then on.
    pub async fn close(self) -> Result<()> {
        debug!("Closing async message queue '{}'", self.name);
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || match inner.lock().take() {
            Some(queue) => queue.close(),
            None => Err(classify(Operation::Close, Errno::EBADF)),
        })
        .await?
    }
}
