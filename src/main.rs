//! # PMQ - Command-Line Entry Point
//!
//! Thin front end over the `pmq` library for creating, inspecting, feeding and
//! draining POSIX message queues from a shell.
//!
//! Message payloads are written to stdout; logs go to stderr (or `--log-file`).
//! Errors are reported through `anyhow` with the classified queue error as the
//! root cause, so a timed-out receive exits non-zero with "timed out".

use anyhow::{Context, Result};
use clap::Parser;
use pmq::{
    cli::{Args, Command},
    utils::format_bytes,
    LimitsProvider, MessageQueue, ProcLimits, QueueAttributes, QueueOptions,
};
use std::io::Write;
use tracing::{debug, info};

fn main() -> Result<()> {
    let args = Args::parse();

    // Held until exit so a file writer flushes.
    let _log_guard = pmq::logging::init(args.verbose, args.log_file.as_deref())?;

    debug!("Arguments: {:?}", args);
    run(args.command)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Create {
            name,
            max_messages,
            max_message_size,
            permissions,
            exclusive,
        } => {
            let mut options = QueueOptions::new()
                .create(true)
                .exclusive(exclusive)
                .permissions(permissions)
                .persist(true);
            options.max_messages = max_messages;
            options.max_message_size = max_message_size;

            let queue = MessageQueue::open(name.as_str(), &options)
                .with_context(|| format!("Failed to create queue '{}'", name))?;
            info!(
                "Created queue '{}' ({} messages of up to {})",
                queue.name(),
                queue.max_messages(),
                format_bytes(queue.max_message_size())
            );
            queue.close()?;
        }
        Command::Send {
            name,
            message,
            priority,
            timeout,
        } => {
            let mut queue = MessageQueue::open_writer(name.as_str())
                .with_context(|| format!("Failed to open queue '{}'", name))?;
            match timeout {
                Some(timeout) => queue.send_timeout(message.as_bytes(), priority, timeout)?,
                None => queue.send(message.as_bytes(), priority)?,
            }
            queue.close()?;
        }
        Command::Receive { name, timeout } => {
            let mut queue = MessageQueue::open_reader(name.as_str())
                .with_context(|| format!("Failed to open queue '{}'", name))?;
            let message = match timeout {
                Some(timeout) => queue.receive_timeout(timeout)?,
                None => queue.receive()?,
            };
            queue.close()?;

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&message)?;
            stdout.flush()?;
        }
        Command::Drain { name } => {
            let mut queue = MessageQueue::open_reader(name.as_str())
                .with_context(|| format!("Failed to open queue '{}'", name))?;
            let mut stdout = std::io::stdout().lock();
            let mut count = 0usize;
            for message in queue.drain() {
                stdout.write_all(&message?)?;
                stdout.write_all(b"\n")?;
                count += 1;
            }
            stdout.flush()?;
            info!("Drained {} messages from '{}'", count, queue.name());
            queue.close()?;
        }
        Command::Stat { name, json } => {
            let queue = MessageQueue::open_reader(name.as_str())
                .with_context(|| format!("Failed to open queue '{}'", name))?;
            let attributes = queue.attributes()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&attributes)?);
            } else {
                print_attributes(queue.name().as_str(), &attributes);
            }
            queue.close()?;
        }
        Command::Unlink { name } => {
            pmq::unlink(name.as_str()).with_context(|| format!("Failed to unlink '{}'", name))?;
            info!("Unlinked queue '{}'", name);
        }
        Command::Limits => {
            let provider = ProcLimits::default();
            let limits = provider.limits()?;
            println!("{:<18} {}", "source", provider.root().display());
            println!("{:<18} {}", "max_messages", limits.max_messages);
            println!(
                "{:<18} {} ({})",
                "max_message_size",
                limits.max_message_size,
                format_bytes(limits.max_message_size)
            );
        }
    }
    Ok(())
}

fn print_attributes(name: &str, attributes: &QueueAttributes) {
    println!("{:<18} {}", "name", name);
    println!(
        "{:<18} {}/{}",
        "messages", attributes.current_messages, attributes.max_messages
    );
    println!(
        "{:<18} {} ({})",
        "max_message_size",
        attributes.max_message_size,
        format_bytes(attributes.max_message_size)
    );
    println!("{:<18} {}", "nonblocking", attributes.is_nonblocking());
    println!("{:<18} {}", "empty", attributes.is_empty());
    println!("{:<18} {}", "full", attributes.is_full());
}
