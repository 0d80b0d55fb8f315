//! # Utility Functions
//!
//! Small helpers shared by the `pmq` binary and the integration tests:
//!
//! - **Naming**: unique queue names so concurrent runs never collide
//! - **Formatting**: human-readable byte sizes for attribute output

use crate::queue::QueueName;
use uuid::Uuid;

/// Generate a unique queue name with the given prefix
///
/// The suffix is a UUID v4 without hyphens, keeping the name well inside the
/// kernel's `NAME_MAX` limit for short prefixes.
pub fn generate_queue_name(prefix: &str) -> QueueName {
    QueueName::new(format!("{}_{}", prefix, Uuid::new_v4().simple()))
}

/// Format a byte count in a human-readable way
///
/// Uses binary units (1 KB = 1024 bytes) with two decimals above one kilobyte.
pub fn format_bytes(bytes: usize) -> String {
    let bytes = bytes as f64;
    if bytes < 1024.0 {
        format!("{:.0} B", bytes)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else if bytes < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} MB", bytes / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    }
}
