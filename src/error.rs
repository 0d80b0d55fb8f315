//! # Error Classification
//!
//! Every call that crosses into the kernel message-queue facility reports
//! failure through `errno`. This module turns that raw code into the crate's
//! typed outcome:
//!
//! - `ETIMEDOUT` becomes [`MqError::Timeout`], a distinct signal callers can
//!   match on without inspecting codes.
//! - Every other code becomes [`MqError::Queue`], carrying the failing
//!   operation, the numeric code and its symbolic name (e.g. `"ENOENT"`).
//!
//! Classification never retries. Failures are surfaced to the caller as-is.

use nix::errno::Errno;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = MqError> = std::result::Result<T, E>;

/// The boundary call that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    Send,
    Receive,
    GetAttributes,
    Close,
    Unlink,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Open => write!(f, "open"),
            Operation::Send => write!(f, "send"),
            Operation::Receive => write!(f, "receive"),
            Operation::GetAttributes => write!(f, "get-attributes"),
            Operation::Close => write!(f, "close"),
            Operation::Unlink => write!(f, "unlink"),
        }
    }
}

/// Errors surfaced by message queue operations
#[derive(Debug, Error)]
pub enum MqError {
    /// The deadline elapsed before the queue had room (send) or a message (receive)
    #[error("message queue operation timed out")]
    Timeout,

    /// Any other failure reported by the kernel facility
    #[error("message queue {op} failed: {name} (errno {code})")]
    Queue {
        op: Operation,
        code: i32,
        name: String,
    },

    /// A system-wide limit could not be read
    #[error("failed to read message queue limit from {path:?}: {reason}")]
    Limits { path: PathBuf, reason: String },

    /// A blocking task driving the queue was cancelled or panicked
    #[error("message queue task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl MqError {
    /// True for the timeout signal
    pub fn is_timeout(&self) -> bool {
        matches!(self, MqError::Timeout)
    }

    /// Numeric errno for kernel-reported failures
    ///
    /// `Timeout` reports `ETIMEDOUT`; errors that did not come from the
    /// kernel have no code.
    pub fn code(&self) -> Option<i32> {
        match self {
            MqError::Timeout => Some(Errno::ETIMEDOUT as i32),
            MqError::Queue { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Symbolic errno name for kernel-reported failures
    pub fn symbolic_name(&self) -> Option<&str> {
        match self {
            MqError::Timeout => Some("ETIMEDOUT"),
            MqError::Queue { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// The errno value, if this error came from the kernel
    pub fn errno(&self) -> Option<Errno> {
        self.code().map(Errno::from_raw)
    }
}

/// Classify an errno produced by `op`
pub fn classify(op: Operation, errno: Errno) -> MqError {
    if errno == Errno::ETIMEDOUT {
        return MqError::Timeout;
    }
    MqError::Queue {
        op,
        code: errno as i32,
        name: format!("{:?}", errno),
    }
}

/// Classify a raw numeric error code produced by `op`
pub fn classify_raw(op: Operation, code: i32) -> MqError {
    classify(op, Errno::from_raw(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_is_timeout() {
        let err = classify(Operation::Receive, Errno::ETIMEDOUT);
        assert!(err.is_timeout());
        assert_eq!(err.symbolic_name(), Some("ETIMEDOUT"));
        assert_eq!(err.code(), Some(libc::ETIMEDOUT));
    }

    #[test]
    fn test_other_codes_are_queue_errors() {
        let err = classify_raw(Operation::Open, libc::ENOENT);
        match &err {
            MqError::Queue { op, code, name } => {
                assert_eq!(*op, Operation::Open);
                assert_eq!(*code, libc::ENOENT);
                assert_eq!(name, "ENOENT");
            }
            other => panic!("unexpected classification: {:?}", other),
        }
        assert!(!err.is_timeout());
        assert_eq!(err.errno(), Some(Errno::ENOENT));
    }

    #[test]
    fn test_oversized_payload_code() {
        let err = classify(Operation::Send, Errno::EMSGSIZE);
        assert_eq!(err.symbolic_name(), Some("EMSGSIZE"));
        assert_eq!(
            err.to_string(),
            format!("message queue send failed: EMSGSIZE (errno {})", libc::EMSGSIZE)
        );
    }

    #[test]
    fn test_eagain_is_not_a_timeout() {
        assert!(!classify(Operation::Send, Errno::EAGAIN).is_timeout());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::GetAttributes.to_string(), "get-attributes");
        assert_eq!(Operation::Unlink.to_string(), "unlink");
    }
}
