use crate::error::{classify, Operation, Result};
use crate::limits::LimitsProvider;
use nix::errno::Errno;
use nix::mqueue::MQ_OFlag;
use nix::sys::stat::Mode;
use serde::{Deserialize, Serialize};

/// Direction(s) a handle may be used in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl AccessMode {
    fn access_flag(self) -> MQ_OFlag {
        match self {
            AccessMode::Read => MQ_OFlag::O_RDONLY,
            AccessMode::Write => MQ_OFlag::O_WRONLY,
            AccessMode::ReadWrite => MQ_OFlag::O_RDWR,
        }
    }
}

/// How to open (and optionally create) a named queue
///
/// Unset size limits are filled in from a [`LimitsProvider`] when the queue
/// is created. A queue that already exists keeps its own limits, and the
/// handle adopts the ones the kernel reports for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOptions {
    pub mode: AccessMode,
    pub create: bool,
    /// Fail with `EEXIST` if creating a name that already exists
    pub exclusive: bool,
    /// Report `EAGAIN` instead of blocking on a full or empty queue
    pub nonblocking: bool,
    pub permissions: u32,
    pub max_messages: Option<usize>,
    pub max_message_size: Option<usize>,
    /// Keep the named queue after the creating handle is closed
    pub persist: bool,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            mode: AccessMode::default(),
            create: false,
            exclusive: false,
            nonblocking: false,
            permissions: crate::defaults::PERMISSIONS,
            max_messages: None,
            max_message_size: None,
            persist: false,
        }
    }
}

impl QueueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn nonblocking(mut self, nonblocking: bool) -> Self {
        self.nonblocking = nonblocking;
        self
    }

    pub fn permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = Some(max_messages);
        self
    }

    pub fn max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = Some(max_message_size);
        self
    }

    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Flags passed to the open call
    pub fn open_flags(&self) -> MQ_OFlag {
        let mut flags = self.mode.access_flag();
        if self.create {
            flags |= MQ_OFlag::O_CREAT;
            if self.exclusive {
                flags |= MQ_OFlag::O_EXCL;
            }
        }
        if self.nonblocking {
            flags |= MQ_OFlag::O_NONBLOCK;
        }
        flags
    }

    /// Fill in unset limits and validate the result
    ///
    /// The provider is only consulted when at least one limit is unset.
    /// Zero limits are rejected with `EINVAL`, the code the kernel itself
    /// uses for them.
    pub fn resolve(&self, limits: &dyn LimitsProvider) -> Result<QueueConfig> {
        let (max_messages, max_message_size) = match (self.max_messages, self.max_message_size) {
            (Some(count), Some(size)) => (count, size),
            (count, size) => {
                let system = limits.limits()?;
                (
                    count.unwrap_or(system.max_messages),
                    size.unwrap_or(system.max_message_size),
                )
            }
        };

        if max_messages == 0 || max_message_size == 0 {
            return Err(classify(Operation::Open, Errno::EINVAL));
        }

        Ok(QueueConfig {
            max_messages,
            max_message_size,
            permissions: Mode::from_bits_truncate(self.permissions as libc::mode_t),
            flags: self.open_flags(),
        })
    }
}

/// Fully resolved configuration for creating a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    pub max_messages: usize,
    pub max_message_size: usize,
    pub permissions: Mode,
    pub flags: MQ_OFlag,
}
