use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// PMQ - inspect and drive POSIX message queues
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[clap(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[clap(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a persistent queue
    Create {
        /// Queue name (a leading '/' is added if missing)
        name: String,

        /// Maximum number of messages (defaults to the system limit)
        #[clap(long)]
        max_messages: Option<usize>,

        /// Maximum message size in bytes (defaults to the system limit)
        #[clap(long)]
        max_message_size: Option<usize>,

        /// Permission bits in octal
        #[clap(long, value_parser = parse_permissions, default_value = "644")]
        permissions: u32,

        /// Fail if the queue already exists
        #[clap(long, default_value_t = false)]
        exclusive: bool,
    },

    /// Send one message
    Send {
        name: String,

        /// Message body
        message: String,

        /// Message priority (higher is received first)
        #[clap(short = 'p', long, default_value_t = crate::defaults::PRIORITY)]
        priority: u32,

        /// Give up after this long if the queue is full (e.g. "2s", whole seconds)
        #[clap(short = 't', long, value_parser = parse_duration)]
        timeout: Option<Duration>,
    },

    /// Receive one message and write it to stdout
    Receive {
        name: String,

        /// Give up after this long if the queue is empty (e.g. "2s", whole seconds)
        #[clap(short = 't', long, value_parser = parse_duration)]
        timeout: Option<Duration>,
    },

    /// Receive every immediately available message, one per line
    Drain { name: String },

    /// Show queue attributes
    Stat {
        name: String,

        /// Print JSON instead of a table
        #[clap(long, default_value_t = false)]
        json: bool,
    },

    /// Remove a queue name from the system
    Unlink { name: String },

    /// Show the system-wide queue limits
    Limits,
}

/// Parse octal permission bits (e.g. "644" or "0o600")
fn parse_permissions(s: &str) -> Result<u32, String> {
    let digits = s.trim().trim_start_matches("0o");
    let bits = u32::from_str_radix(digits, 8)
        .map_err(|_| format!("Invalid octal permissions: {}", s))?;
    if bits > 0o777 {
        return Err(format!("Permissions out of range: {}", s));
    }
    Ok(bits)
}

/// Parse duration from string (e.g., "10s", "5m", "1h")
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Duration cannot be empty".to_string());
    }

    let (num_str, unit) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, "ms")
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, "s")
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, "m")
    } else if let Some(stripped) = s.strip_suffix('h') {
        (stripped, "h")
    } else {
        (s, "s") // Default to seconds
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number in duration: {}", num_str))?;
    if !num.is_finite() || num < 0.0 {
        return Err(format!("Duration must be a non-negative number: {}", s));
    }

    let duration = match unit {
        "ms" => Duration::from_millis(num as u64),
        "s" => Duration::try_from_secs_f64(num)
            .map_err(|e| format!("Duration out of range: {}: {}", s, e))?,
        "m" => Duration::from_secs((num * 60.0) as u64),
        "h" => Duration::from_secs((num * 3600.0) as u64),
        _ => return Err(format!("Invalid duration unit: {}", unit)),
    };

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);

        assert!(parse_duration("").is_err());
        assert!(parse_duration("invalid").is_err());
        assert!(parse_duration("-1").is_err());
        assert!(parse_duration("inf").is_err());
        assert!(parse_duration("1e20").is_err());
    }

    #[test]
    fn test_parse_permissions() {
        assert_eq!(parse_permissions("644").unwrap(), 0o644);
        assert_eq!(parse_permissions("0o600").unwrap(), 0o600);
        assert!(parse_permissions("999").is_err());
        assert!(parse_permissions("1777").is_err());
    }

    #[test]
    fn test_send_arguments() {
        let args = Args::parse_from(["pmq", "send", "jobs", "hello", "-p", "7", "--timeout", "2s"]);
        assert_eq!(
            args.command,
            Command::Send {
                name: "jobs".to_string(),
                message: "hello".to_string(),
                priority: 7,
                timeout: Some(Duration::from_secs(2)),
            }
        );
        assert!(!args.verbose);
    }

    #[test]
    fn test_create_defaults() {
        let args = Args::parse_from(["pmq", "-v", "create", "jobs"]);
        assert!(args.verbose);
        assert_eq!(
            args.command,
            Command::Create {
                name: "jobs".to_string(),
                max_messages: None,
                max_message_size: None,
                permissions: 0o644,
                exclusive: false,
            }
        );
    }

    #[test]
    fn test_receive_without_timeout_blocks() {
        let args = Args::parse_from(["pmq", "receive", "jobs"]);
        assert_eq!(
            args.command,
            Command::Receive {
                name: "jobs".to_string(),
                timeout: None,
            }
        );
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Args::try_parse_from(["pmq", "peek", "jobs"]).is_err());
    }
}
