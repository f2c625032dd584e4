//! Concrete [`Logger`] implementations.
//!
//! Every backend keeps its level in an atomic so it can be changed through
//! `&self`. The level is reported back unchanged and never used to drop lines.

use crate::{Logger, LoggingLevel, LOG_TARGET};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, PoisonError};

/// Which logger method produced a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMethod {
    Verbose,
    Debug,
    Info,
    Warning,
    Error,
    Fail,
}

impl LogMethod {
    /// Single-letter label used in plain console lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Verbose => "V",
            Self::Debug => "D",
            Self::Info => "I",
            Self::Warning => "W",
            Self::Error => "E",
            Self::Fail => "F",
        }
    }
}

impl fmt::Display for LogMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Verbose => "verbose",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fail => "fail",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct LevelCell(AtomicI32);

impl LevelCell {
    fn new(level: LoggingLevel) -> Self {
        Self(AtomicI32::new(level.as_i32()))
    }

    fn get(&self) -> i32 {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, level: i32) {
        self.0.store(level, Ordering::Relaxed);
    }
}

fn resolve_tag(default: &str, instance: &str) -> String {
    if instance.is_empty() {
        default.to_owned()
    } else {
        instance.to_owned()
    }
}

/// Implements [`Logger`] for a backend with `tag` and `level` fields and an
/// inherent `emit(method, Option<tag>, content)`.
macro_rules! backend_logger {
    () => {
        fn verbose(&self, content: &str) {
            self.emit(LogMethod::Verbose, None, content);
        }
        fn verbose_tagged(&self, tag: &str, content: &str) {
            self.emit(LogMethod::Verbose, Some(tag), content);
        }
        fn debug(&self, content: &str) {
            self.emit(LogMethod::Debug, None, content);
        }
        fn debug_tagged(&self, tag: &str, content: &str) {
            self.emit(LogMethod::Debug, Some(tag), content);
        }
        fn info(&self, content: &str) {
            self.emit(LogMethod::Info, None, content);
        }
        fn info_tagged(&self, tag: &str, content: &str) {
            self.emit(LogMethod::Info, Some(tag), content);
        }
        fn warning(&self, content: &str) {
            self.emit(LogMethod::Warning, None, content);
        }
        fn warning_tagged(&self, tag: &str, content: &str) {
            self.emit(LogMethod::Warning, Some(tag), content);
        }
        fn error(&self, content: &str) {
            self.emit(LogMethod::Error, None, content);
        }
        fn error_tagged(&self, tag: &str, content: &str) {
            self.emit(LogMethod::Error, Some(tag), content);
        }
        fn fail(&self, content: &str) {
            self.emit(LogMethod::Fail, None, content);
        }
        fn fail_tagged(&self, tag: &str, content: &str) {
            self.emit(LogMethod::Fail, Some(tag), content);
        }
        fn set_level(&self, level: LoggingLevel) {
            self.level.set(level.as_i32());
        }
        fn set_level_raw(&self, level: i32) {
            self.level.set(level);
        }
        fn level(&self) -> i32 {
            self.level.get()
        }
        fn tag_for(&self, instance: &str) -> String {
            resolve_tag(&self.tag, instance)
        }
        fn logger_for(&self, _instance: &str) -> &dyn Logger {
            self
        }
    };
}

/// Logger that emits `tracing` events on the `memlog` target.
///
/// Verbose maps to `TRACE`, warning to `WARN`, and fail to `ERROR` with a
/// `fail = true` field.
#[derive(Debug)]
pub struct TracingLogger {
    tag: String,
    level: LevelCell,
}

impl TracingLogger {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            level: LevelCell::new(LoggingLevel::default()),
        }
    }

    fn emit(&self, method: LogMethod, tag: Option<&str>, content: &str) {
        let tag = tag.unwrap_or(&self.tag);
        match method {
            LogMethod::Verbose => tracing::trace!(target: LOG_TARGET, tag, "{content}"),
            LogMethod::Debug => tracing::debug!(target: LOG_TARGET, tag, "{content}"),
            LogMethod::Info => tracing::info!(target: LOG_TARGET, tag, "{content}"),
            LogMethod::Warning => tracing::warn!(target: LOG_TARGET, tag, "{content}"),
            LogMethod::Error => tracing::error!(target: LOG_TARGET, tag, "{content}"),
            LogMethod::Fail => tracing::error!(target: LOG_TARGET, tag, fail = true, "{content}"),
        }
    }
}

impl Logger for TracingLogger {
    backend_logger!();
}

/// Output format of [`ConsoleLogger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// `I/tag: content`
    #[default]
    Plain,
    /// `{"level":"info","tag":"tag","message":"content"}`
    Json,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    level: LogMethod,
    tag: &'a str,
    message: &'a str,
}

/// Logger writing one line per call to a writer.
///
/// Write failures are ignored, the same way a platform log call never
/// reports back to its caller.
#[derive(Debug)]
pub struct ConsoleLogger<W: Write = io::Stderr> {
    writer: Mutex<W>,
    tag: String,
    format: LineFormat,
    level: LevelCell,
}

impl ConsoleLogger<io::Stderr> {
    /// Console logger on standard error.
    pub fn stderr(tag: impl Into<String>) -> Self {
        Self::new(io::stderr(), tag)
    }
}

impl<W: Write> ConsoleLogger<W> {
    pub fn new(writer: W, tag: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            tag: tag.into(),
            format: LineFormat::default(),
            level: LevelCell::new(LoggingLevel::default()),
        }
    }

    /// Switch the line format.
    #[must_use]
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn format_line(&self, method: LogMethod, tag: &str, content: &str) -> Option<String> {
        match self.format {
            LineFormat::Plain => Some(format!("{}/{}: {}", method.label(), tag, content)),
            LineFormat::Json => serde_json::to_string(&JsonLine {
                level: method,
                tag,
                message: content,
            })
            .ok(),
        }
    }

    fn emit(&self, method: LogMethod, tag: Option<&str>, content: &str) {
        let Some(line) = self.format_line(method, tag.unwrap_or(&self.tag), content) else {
            return;
        };
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "{line}");
    }
}

impl<W: Write> Logger for ConsoleLogger<W> {
    backend_logger!();
}

/// Logger that drops every line.
#[derive(Debug)]
pub struct NoopLogger {
    tag: String,
    level: LevelCell,
}

impl NoopLogger {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            level: LevelCell::new(LoggingLevel::default()),
        }
    }

    fn emit(&self, _method: LogMethod, _tag: Option<&str>, _content: &str) {}
}

impl Default for NoopLogger {
    fn default() -> Self {
        Self::new("")
    }
}

impl Logger for NoopLogger {
    backend_logger!();
}

/// One call received by a [`CapturingLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub method: LogMethod,
    /// Tag passed by the caller, `None` for untagged calls
    pub tag: Option<String>,
    pub content: String,
}

/// Logger that records every call, for tests and inspection.
///
/// # Examples
///
/// ```rust
/// use memlog_rs_core::{CapturingLogger, Logger, LogMethod};
///
/// let logger = CapturingLogger::new("test");
/// logger.info("hello");
/// assert_eq!(logger.records()[0].content, "hello");
/// assert_eq!(logger.records()[0].tag, None);
/// ```
#[derive(Debug)]
pub struct CapturingLogger {
    records: Mutex<Vec<LogRecord>>,
    tag: String,
    level: LevelCell,
}

impl CapturingLogger {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            tag: tag.into(),
            level: LevelCell::new(LoggingLevel::default()),
        }
    }

    /// Copy of everything recorded so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn emit(&self, method: LogMethod, tag: Option<&str>, content: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                method,
                tag: tag.map(str::to_owned),
                content: content.to_owned(),
            });
    }
}

impl Logger for CapturingLogger {
    backend_logger!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorArg;

    fn console_output(logger: ConsoleLogger<Vec<u8>>) -> String {
        String::from_utf8(logger.into_inner()).unwrap()
    }

    #[test]
    fn test_console_plain_lines() {
        let logger = ConsoleLogger::new(Vec::new(), "app");
        logger.info("started");
        logger.warning_tagged("net", "slow");
        logger.fail("impossible");

        assert_eq!(
            console_output(logger),
            "I/app: started\nW/net: slow\nF/app: impossible\n"
        );
    }

    #[test]
    fn test_console_json_lines() {
        let logger = ConsoleLogger::new(Vec::new(), "app").with_format(LineFormat::Json);
        logger.error_tagged("db", "say \"hi\"");

        let output = console_output(logger);
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["tag"], "db");
        assert_eq!(value["message"], "say \"hi\"");
    }

    #[test]
    fn test_console_error_convenience() {
        let logger = ConsoleLogger::new(Vec::new(), "app");
        logger.e(ErrorArg::from("broken"));
        logger.e(ErrorArg::Absent);

        assert_eq!(console_output(logger), "E/app: broken\n");
    }

    #[test]
    fn test_level_is_stored_not_applied() {
        let logger = CapturingLogger::new("t");
        assert_eq!(logger.level(), LoggingLevel::Verbose.as_i32());

        logger.set_level(LoggingLevel::Error);
        logger.debug("still recorded");
        assert_eq!(logger.level(), 6);
        assert_eq!(logger.records().len(), 1);

        logger.set_level_raw(99);
        assert_eq!(logger.level(), 99);
    }

    #[test]
    fn test_tag_resolution() {
        let logger = NoopLogger::new("fallback");
        assert_eq!(logger.tag_for("Client"), "Client");
        assert_eq!(logger.tag_for(""), "fallback");
    }

    #[test]
    fn test_capturing_records_tags() {
        let logger = CapturingLogger::new("t");
        logger.verbose("a");
        logger.verbose_tagged("x", "b");

        let records = logger.records();
        assert_eq!(records[0].tag, None);
        assert_eq!(records[1].tag.as_deref(), Some("x"));
        assert_eq!(records[1].method, LogMethod::Verbose);

        logger.clear();
        assert!(logger.last().is_none());
    }

    #[test]
    fn test_tracing_logger_does_not_panic_without_subscriber() {
        let logger = TracingLogger::new("t");
        logger.verbose("v");
        logger.fail_tagged("x", "f");
        logger.set_level(LoggingLevel::Info);
        assert_eq!(logger.level(), 4);
        assert!(std::ptr::eq(
            logger.logger_for("any") as *const dyn Logger as *const u8,
            &logger as *const TracingLogger as *const u8,
        ));
    }
}
