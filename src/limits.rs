//! # System Limits Discovery
//!
//! When a caller creates a queue without choosing its capacity or message size,
//! the values default to the system-wide maxima the kernel will accept. On Linux
//! these are published under `/proc/sys/fs/mqueue`:
//!
//! - `msgsize_max`: largest message size a queue may be configured with
//! - `msg_max`: largest message count a queue may be configured with
//!
//! [`LimitsProvider`] is the seam used by queue construction, so tests and
//! embedders can substitute fixed values.

use crate::error::{MqError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// System-wide message queue limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLimits {
    pub max_message_size: usize,
    pub max_messages: usize,
}

/// Source of system-wide defaults for queue configuration
pub trait LimitsProvider {
    fn limits(&self) -> Result<SystemLimits>;
}

/// A fixed set of limits provides itself
impl LimitsProvider for SystemLimits {
    fn limits(&self) -> Result<SystemLimits> {
        Ok(*self)
    }
}

/// Limits read from a procfs-style directory
#[derive(Debug, Clone)]
pub struct ProcLimits {
    root: PathBuf,
}

impl ProcLimits {
    /// Read limits from files in `root` instead of the default procfs directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_value(&self, file: &str) -> Result<usize> {
        let path = self.root.join(file);
        let raw = fs::read_to_string(&path).map_err(|e| MqError::Limits {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let value: usize = raw.trim().parse().map_err(|e| MqError::Limits {
            path: path.clone(),
            reason: format!("invalid value {:?}: {}", raw.trim(), e),
        })?;
        if value == 0 {
            return Err(MqError::Limits {
                path,
                reason: "limit must be positive".to_string(),
            });
        }
        Ok(value)
    }
}

impl Default for ProcLimits {
    fn default() -> Self {
        Self::with_root(crate::defaults::PROC_LIMITS_DIR)
    }
}

impl LimitsProvider for ProcLimits {
    fn limits(&self) -> Result<SystemLimits> {
        let limits = SystemLimits {
            max_message_size: self.read_value("msgsize_max")?,
            max_messages: self.read_value("msg_max")?,
        };
        debug!("Read system message queue limits from {:?}: {:?}", self.root, limits);
        Ok(limits)
    }
}
