//! memlog-rs-memory: log one message annotated with memory usage.
//!
//! Settings come from ~/.config/memlog-rs/config.ron and can be overridden
//! on the command line.

use anyhow::Context;
use clap::Parser;
use memlog_rs_core::{
    Backend, ConsoleLogger, LineFormat, Logger, LoggingLevel, MemlogConfig, MemoryUnit,
    TracingLogger, LOG_TARGET,
};
use memlog_rs_memory::{MemoryUsageLogger, ProcMemoryProvider};
use std::process;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the memory logger.
#[derive(Parser)]
#[command(name = "memlog-rs-memory")]
#[command(about = "Log a message annotated with current memory usage")]
#[command(version)]
#[command(author)]
struct Args {
    /// Message to log
    #[arg(required_unless_present = "check")]
    message: Option<String>,

    /// Memory unit (bytes, kilobytes, megabytes)
    #[arg(short, long)]
    unit: Option<MemoryUnit>,

    /// Level to log at (verbose, debug, info, warning, error, fail)
    #[arg(short, long)]
    level: Option<LoggingLevel>,

    /// Tag for this line (defaults to the configured tag)
    #[arg(short, long)]
    tag: Option<String>,

    /// Backend to write to (console, tracing)
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Write JSON lines (console backend only)
    #[arg(long)]
    json: bool,

    /// Check memory counter availability and exit
    #[arg(long)]
    check: bool,
}

fn log_at(logger: &dyn Logger, level: LoggingLevel, tag: Option<&str>, message: &str) {
    match (level, tag) {
        (LoggingLevel::Verbose, None) => logger.verbose(message),
        (LoggingLevel::Verbose, Some(tag)) => logger.verbose_tagged(tag, message),
        (LoggingLevel::Debug, None) => logger.debug(message),
        (LoggingLevel::Debug, Some(tag)) => logger.debug_tagged(tag, message),
        (LoggingLevel::Info, None) => logger.info(message),
        (LoggingLevel::Info, Some(tag)) => logger.info_tagged(tag, message),
        (LoggingLevel::Warning, None) => logger.warning(message),
        (LoggingLevel::Warning, Some(tag)) => logger.warning_tagged(tag, message),
        (LoggingLevel::Error, None) => logger.error(message),
        (LoggingLevel::Error, Some(tag)) => logger.error_tagged(tag, message),
        (LoggingLevel::Fail, None) => logger.fail(message),
        (LoggingLevel::Fail, Some(tag)) => logger.fail_tagged(tag, message),
    }
}

/// Filter used when `RUST_LOG` is unset: the `memlog` target follows the
/// configured level so verbose and debug lines reach the tracing backend.
fn default_filter(level: LoggingLevel) -> String {
    let memlog = match level {
        LoggingLevel::Verbose => "trace",
        LoggingLevel::Debug => "debug",
        _ => return "info".to_owned(),
    };
    format!("info,{}={}", LOG_TARGET, memlog)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration and apply command line overrides
    let mut config = MemlogConfig::load().context("Failed to load configuration")?;
    if let Some(unit) = args.unit {
        config.unit = unit;
    }
    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    config.json |= args.json;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(config.level))),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.check {
        match ProcMemoryProvider::new().check_availability() {
            Ok(()) => {
                println!("Memory counters are available");
                return Ok(());
            }
            Err(e) => {
                eprintln!("Memory counters are not available: {}", e);
                process::exit(1);
            }
        }
    }

    let backend: Box<dyn Logger> = match config.backend {
        Backend::Console => {
            let format = if config.json {
                LineFormat::Json
            } else {
                LineFormat::Plain
            };
            Box::new(ConsoleLogger::stderr(config.tag.clone()).with_format(format))
        }
        Backend::Tracing => Box::new(TracingLogger::new(config.tag.clone())),
    };
    backend.set_level(config.level);

    let logger = MemoryUsageLogger::new(backend, config.unit);
    let message = args.message.unwrap_or_default();
    log_at(&logger, config.level, args.tag.as_deref(), &message);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use memlog_rs_core::{CapturingLogger, LogMethod};

    #[test]
    fn test_log_at_routes_every_level() {
        let cases = [
            (LoggingLevel::Verbose, LogMethod::Verbose),
            (LoggingLevel::Debug, LogMethod::Debug),
            (LoggingLevel::Info, LogMethod::Info),
            (LoggingLevel::Warning, LogMethod::Warning),
            (LoggingLevel::Error, LogMethod::Error),
            (LoggingLevel::Fail, LogMethod::Fail),
        ];

        for (level, method) in cases {
            for tag in [None, Some("T")] {
                let logger = CapturingLogger::new("app");
                log_at(&logger, level, tag, "hello");

                let records = logger.records();
                assert_eq!(records.len(), 1, "{level} {tag:?}");
                assert_eq!(records[0].method, method, "{level} {tag:?}");
                assert_eq!(records[0].tag.as_deref(), tag, "{level} {tag:?}");
                assert_eq!(records[0].content, "hello");
            }
        }
    }

    #[test]
    fn test_log_at_through_decorator() {
        let logger = MemoryUsageLogger::new(CapturingLogger::new("app"), MemoryUnit::Kilobytes);
        log_at(&logger, LoggingLevel::Warning, Some("T"), "low");

        let record = logger.inner().last().unwrap();
        assert_eq!(record.method, LogMethod::Warning);
        assert_eq!(record.tag.as_deref(), Some("T"));
        assert!(record.content.ends_with(" FOR low"));
    }

    #[test]
    fn test_default_filter_follows_level() {
        assert_eq!(default_filter(LoggingLevel::Verbose), "info,memlog=trace");
        assert_eq!(default_filter(LoggingLevel::Debug), "info,memlog=debug");
        assert_eq!(default_filter(LoggingLevel::Info), "info");
        assert_eq!(default_filter(LoggingLevel::Fail), "info");

        for level in [LoggingLevel::Verbose, LoggingLevel::Debug, LoggingLevel::Info] {
            assert!(EnvFilter::try_new(default_filter(level)).is_ok());
        }
    }
}
