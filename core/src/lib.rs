//! # memlog-rs-core
//!
//! Core library for the memlog-rs suite providing the shared logger
//! capability and the pieces every decorator builds on.
//!
//! ## Features
//!
//! - **Logger trait** - One interface for every backend and decorator
//! - **Logging levels** - Android-style priorities with numeric and named forms
//! - **Memory units** - Divisor and display suffix for memory reports
//! - **Configuration management** - RON-based configuration with defaults
//! - **Backends** - `tracing`, console, no-op and capturing loggers
//! - **Named regex matches** - Named-group accessors over `regex` captures
//! - **Error handling** - Error type with context and constructor helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use memlog_rs_core::{ConsoleLogger, Logger, ErrorArg};
//!
//! let logger = ConsoleLogger::new(Vec::new(), "app");
//! logger.info("started");
//! logger.warning_tagged("net", "slow response");
//! logger.e(ErrorArg::from("boom"));
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod backend;
pub mod matching;

pub use backend::{
    CapturingLogger, ConsoleLogger, LineFormat, LogMethod, LogRecord, NoopLogger, TracingLogger,
};
pub use matching::{MatchResult, RegexMatch};

/// Target used for the crate's own diagnostics.
pub const LOG_TARGET: &str = "memlog";

/// Result type for memlog operations.
pub type Result<T> = std::result::Result<T, MemlogError>;

/// Logging priority, numbered like Android's `android.util.Log` constants.
///
/// # Examples
///
/// ```rust
/// use memlog_rs_core::LoggingLevel;
///
/// let level: LoggingLevel = "warning".parse().unwrap();
/// assert_eq!(level.as_i32(), 5);
/// assert_eq!(LoggingLevel::try_from(5).unwrap(), LoggingLevel::Warning);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Verbose = 2,
    Debug = 3,
    Info = 4,
    Warning = 5,
    Error = 6,
    Fail = 7,
}

impl LoggingLevel {
    /// Numeric priority of this level.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

impl Default for LoggingLevel {
    /// Everything is logged unless configured otherwise.
    fn default() -> Self {
        Self::Verbose
    }
}

impl TryFrom<i32> for LoggingLevel {
    type Error = MemlogError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            2 => Ok(Self::Verbose),
            3 => Ok(Self::Debug),
            4 => Ok(Self::Info),
            5 => Ok(Self::Warning),
            6 => Ok(Self::Error),
            7 => Ok(Self::Fail),
            _ => Err(MemlogError::InvalidLevel { value }),
        }
    }
}

impl fmt::Display for LoggingLevel {
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

impl std::str::FromStr for LoggingLevel {
    type Err = LoggingLevelParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "verbose" | "v" | "trace" => Ok(Self::Verbose),
            "debug" | "d" => Ok(Self::Debug),
            "info" | "i" => Ok(Self::Info),
            "warning" | "warn" | "w" => Ok(Self::Warning),
            "error" | "e" => Ok(Self::Error),
            "fail" | "f" | "assert" => Ok(Self::Fail),
            _ => Err(LoggingLevelParseError {
                input: s.to_owned(),
                valid_options: &["verbose", "debug", "info", "warning", "error", "fail"],
            }),
        }
    }
}

/// Error type for parsing [`LoggingLevel`] from string.
#[derive(Debug, thiserror::Error)]
#[error("Invalid logging level '{input}'. Valid options: {}", valid_options.join(", "))]
pub struct LoggingLevelParseError {
    input: String,
    valid_options: &'static [&'static str],
}

/// Unit used when reporting memory sizes.
///
/// Each unit has a divisor applied to byte counts (with truncation) and a
/// suffix appended to the reported numbers.
///
/// # Examples
///
/// ```rust
/// use memlog_rs_core::MemoryUnit;
///
/// assert_eq!(MemoryUnit::Kilobytes.divisor(), 1024);
/// assert_eq!(MemoryUnit::Kilobytes.convert(1500), 1);
/// assert_eq!(MemoryUnit::Megabytes.suffix(), "MB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryUnit {
    Bytes,
    Kilobytes,
    Megabytes,
}

impl MemoryUnit {
    /// Number of bytes in one unit.
    #[must_use]
    pub const fn divisor(self) -> u64 {
        match self {
            Self::Bytes => 1,
            Self::Kilobytes => 1024,
            Self::Megabytes => 1_048_576,
        }
    }

    /// Suffix printed after a value in this unit.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Bytes => "Bytes",
            Self::Kilobytes => "KB",
            Self::Megabytes => "MB",
        }
    }

    /// Convert a byte count into this unit, truncating any remainder.
    #[must_use]
    pub const fn convert(self, bytes: u64) -> u64 {
        bytes / self.divisor()
    }
}

impl Default for MemoryUnit {
    fn default() -> Self {
        Self::Kilobytes
    }
}

impl fmt::Display for MemoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bytes => "bytes",
            Self::Kilobytes => "kilobytes",
            Self::Megabytes => "megabytes",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for MemoryUnit {
    type Err = MemoryUnitParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bytes" | "byte" | "b" => Ok(Self::Bytes),
            "kilobytes" | "kb" | "k" => Ok(Self::Kilobytes),
            "megabytes" | "mb" | "m" => Ok(Self::Megabytes),
            _ => Err(MemoryUnitParseError {
                input: s.to_owned(),
                valid_options: &["bytes", "kilobytes", "megabytes"],
            }),
        }
    }
}

/// Error type for parsing [`MemoryUnit`] from string.
#[derive(Debug, thiserror::Error)]
#[error("Invalid memory unit '{input}'. Valid options: {}", valid_options.join(", "))]
pub struct MemoryUnitParseError {
    input: String,
    valid_options: &'static [&'static str],
}

/// Argument accepted by [`Logger::e`]: a plain message or an error value.
///
/// # Examples
///
/// ```rust
/// use memlog_rs_core::ErrorArg;
///
/// let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// assert_eq!(ErrorArg::from_error(&io).text(), Some("disk full"));
/// assert_eq!(ErrorArg::from("plain").text(), Some("plain"));
/// assert_eq!(ErrorArg::from(None::<&str>).text(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorArg<'a> {
    /// A message logged as is.
    Message(Cow<'a, str>),
    /// An error value with its message (if any) and its full description.
    Failure {
        message: Option<Cow<'a, str>>,
        description: Cow<'a, str>,
    },
    /// Nothing to log.
    Absent,
}

impl<'a> ErrorArg<'a> {
    /// Capture an error's `Display` text as message and its `Debug` text as
    /// description.
    pub fn from_error<E>(error: &E) -> ErrorArg<'static>
    where
        E: std::error::Error + ?Sized,
    {
        ErrorArg::Failure {
            message: Some(Cow::Owned(error.to_string())),
            description: Cow::Owned(format!("{error:?}")),
        }
    }

    /// Text that gets logged for this argument, if any.
    ///
    /// A failure with an empty or missing message falls back to its
    /// description.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Message(message) => Some(message.as_ref()),
            Self::Failure {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message.as_ref()),
            Self::Failure { description, .. } => Some(description.as_ref()),
            Self::Absent => None,
        }
    }
}

impl<'a> From<&'a str> for ErrorArg<'a> {
    fn from(message: &'a str) -> Self {
        Self::Message(Cow::Borrowed(message))
    }
}

impl From<String> for ErrorArg<'static> {
    fn from(message: String) -> Self {
        Self::Message(Cow::Owned(message))
    }
}

impl<'a, T> From<Option<T>> for ErrorArg<'a>
where
    T: Into<ErrorArg<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Short type name of `T`, suitable as a log tag.
///
/// Module path and generic parameters are stripped, so
/// `my_app::net::Client<u8>` becomes `Client`.
#[must_use]
pub fn type_tag<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// The logger capability shared by every backend and decorator.
///
/// Each level comes in an untagged form, which uses the logger's own tag, and
/// a `_tagged` form. Level state is read and written through `&self`, so
/// implementations that keep it use interior mutability.
///
/// # Examples
///
/// ```rust
/// use memlog_rs_core::{CapturingLogger, Logger, LogMethod};
///
/// let logger = CapturingLogger::new("test");
/// logger.debug_tagged("db", "connected");
///
/// let record = logger.last().unwrap();
/// assert_eq!(record.method, LogMethod::Debug);
/// assert_eq!(record.tag.as_deref(), Some("db"));
/// ```
pub trait Logger {
    fn verbose(&self, content: &str);
    fn verbose_tagged(&self, tag: &str, content: &str);

    fn debug(&self, content: &str);
    fn debug_tagged(&self, tag: &str, content: &str);

    fn info(&self, content: &str);
    fn info_tagged(&self, tag: &str, content: &str);

    fn warning(&self, content: &str);
    fn warning_tagged(&self, tag: &str, content: &str);

    fn error(&self, content: &str);
    fn error_tagged(&self, tag: &str, content: &str);

    /// Log a failure that should never happen.
    fn fail(&self, content: &str);
    fn fail_tagged(&self, tag: &str, content: &str);

    /// Debug-log any displayable value.
    fn d(&self, message: &dyn fmt::Display) {
        self.debug(&message.to_string());
    }

    /// Error-log a message or an error value. [`ErrorArg::Absent`] is ignored.
    fn e(&self, arg: ErrorArg<'_>) {
        if let Some(text) = arg.text() {
            self.error(text);
        }
    }

    /// Error-log a message followed by its cause as `"{message} => {cause}"`.
    fn e_with_cause(&self, message: &str, cause: &dyn std::error::Error) {
        self.error(&format!("{message} => {cause}"));
    }

    fn set_level(&self, level: LoggingLevel);

    /// Set the level from its raw priority number.
    fn set_level_raw(&self, level: i32);

    /// Current raw priority number.
    fn level(&self) -> i32;

    /// Tag used when logging on behalf of `instance` (a type tag, see
    /// [`type_tag`]).
    fn tag_for(&self, instance: &str) -> String;

    /// Logger to use on behalf of `instance`.
    fn logger_for(&self, instance: &str) -> &dyn Logger;
}

macro_rules! forward_logger {
    () => {
        fn verbose(&self, content: &str) {
            (**self).verbose(content)
        }
        fn verbose_tagged(&self, tag: &str, content: &str) {
            (**self).verbose_tagged(tag, content)
        }
        fn debug(&self, content: &str) {
            (**self).debug(content)
        }
        fn debug_tagged(&self, tag: &str, content: &str) {
            (**self).debug_tagged(tag, content)
        }
        fn info(&self, content: &str) {
            (**self).info(content)
        }
        fn info_tagged(&self, tag: &str, content: &str) {
            (**self).info_tagged(tag, content)
        }
        fn warning(&self, content: &str) {
            (**self).warning(content)
        }
        fn warning_tagged(&self, tag: &str, content: &str) {
            (**self).warning_tagged(tag, content)
        }
        fn error(&self, content: &str) {
            (**self).error(content)
        }
        fn error_tagged(&self, tag: &str, content: &str) {
            (**self).error_tagged(tag, content)
        }
        fn fail(&self, content: &str) {
            (**self).fail(content)
        }
        fn fail_tagged(&self, tag: &str, content: &str) {
            (**self).fail_tagged(tag, content)
        }
        fn d(&self, message: &dyn fmt::Display) {
            (**self).d(message)
        }
        fn e(&self, arg: ErrorArg<'_>) {
            (**self).e(arg)
        }
        fn e_with_cause(&self, message: &str, cause: &dyn std::error::Error) {
            (**self).e_with_cause(message, cause)
        }
        fn set_level(&self, level: LoggingLevel) {
            (**self).set_level(level)
        }
        fn set_level_raw(&self, level: i32) {
            (**self).set_level_raw(level)
        }
        fn level(&self) -> i32 {
            (**self).level()
        }
        fn tag_for(&self, instance: &str) -> String {
            (**self).tag_for(instance)
        }
        fn logger_for(&self, instance: &str) -> &dyn Logger {
            (**self).logger_for(instance)
        }
    };
}

impl<L: Logger + ?Sized> Logger for &L {
    forward_logger!();
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    forward_logger!();
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    forward_logger!();
}

/// Which backend the binary logs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Plain lines on stderr
    Console,
    /// Events on the installed `tracing` subscriber
    Tracing,
}

impl Default for Backend {
    fn default() -> Self {
        Self::Tracing
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Console => "console",
            Self::Tracing => "tracing",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Backend {
    type Err = BackendParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" | "stderr" => Ok(Self::Console),
            "tracing" => Ok(Self::Tracing),
            _ => Err(BackendParseError {
                input: s.to_owned(),
                valid_options: &["console", "tracing"],
            }),
        }
    }
}

/// Error type for parsing [`Backend`] from string.
#[derive(Debug, thiserror::Error)]
#[error("Invalid backend '{input}'. Valid options: {}", valid_options.join(", "))]
pub struct BackendParseError {
    input: String,
    valid_options: &'static [&'static str],
}

/// Configuration loaded from ~/.config/memlog-rs/config.ron
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemlogConfig {
    /// Unit for memory figures
    #[serde(default)]
    pub unit: MemoryUnit,
    /// Level lines are logged at, also applied to the backend
    #[serde(default = "default_level")]
    pub level: LoggingLevel,
    /// Default tag for untagged lines
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Backend lines are written to
    #[serde(default)]
    pub backend: Backend,
    /// Write JSON lines instead of plain text (console backend only)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> LoggingLevel {
    LoggingLevel::Info
}

fn default_tag() -> String {
    "memlog".to_owned()
}

impl Default for MemlogConfig {
    fn default() -> Self {
        Self {
            unit: MemoryUnit::default(),
            level: default_level(),
            tag: default_tag(),
            backend: Backend::default(),
            json: false,
        }
    }
}

impl MemlogConfig {
    /// Load configuration from the standard config file location.
    ///
    /// Searches for config in:
    /// 1. ~/.config/memlog-rs/config.ron
    /// 2. ~/.memlog-rs/config.ron (fallback)
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::find_config_file() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: MemlogConfig = ron::from_str(&content)
            .map_err(|e| MemlogError::parse_with_source("Failed to parse config file", e))?;

        tracing::debug!(target: LOG_TARGET, path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Find the config file in standard locations.
    pub fn find_config_file() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_path = config_dir.join("memlog-rs").join("config.ron");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".memlog-rs").join("config.ron");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        None
    }

    /// Get the default config file path for writing.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("memlog-rs").join("config.ron"))
    }

    /// Save configuration to the default config file location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()
            .ok_or_else(|| MemlogError::config("Could not determine config directory"))?;
        self.save_to_file(&config_path)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| MemlogError::parse_with_source("Failed to serialize config", e))?;

        std::fs::write(path, content)?;

        Ok(())
    }
}

/// Common error types for memlog operations.
#[derive(Debug, thiserror::Error)]
pub enum MemlogError {
    /// I/O error while reading counters or configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing text input.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what failed to parse
        message: String,
        /// Optional source error for chaining
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error (invalid settings, etc.).
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration issue
        message: String,
        /// The invalid configuration value if applicable
        value: Option<String>,
    },

    /// A memory counter could not be read.
    #[error("Memory counter '{counter}' unavailable: {reason}")]
    MemoryUnavailable {
        /// Which counter was being read
        counter: String,
        /// Why it could not be read
        reason: String,
    },

    /// A raw level number outside the known priorities.
    #[error("Invalid logging level: {value}")]
    InvalidLevel { value: i32 },
}

impl MemlogError {
    /// Create a new parse error with a simple message.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new parse error with a source error.
    pub fn parse_with_source<S: Into<String>, E>(message: S, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            value: None,
        }
    }

    /// Create a new configuration error with the invalid value.
    pub fn config_with_value<S: Into<String>, V: Into<String>>(message: S, value: V) -> Self {
        Self::Config {
            message: message.into(),
            value: Some(value.into()),
        }
    }

    /// Create a new memory-unavailable error.
    pub fn memory_unavailable<C: Into<String>, R: Into<String>>(counter: C, reason: R) -> Self {
        Self::MemoryUnavailable {
            counter: counter.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from memory introspection.
    #[must_use]
    pub fn is_memory_unavailable(&self) -> bool {
        matches!(self, Self::MemoryUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_level_numbers() {
        assert_eq!(LoggingLevel::Verbose.as_i32(), 2);
        assert_eq!(LoggingLevel::Fail.as_i32(), 7);
        assert_eq!(LoggingLevel::try_from(5).unwrap(), LoggingLevel::Warning);
        assert!(matches!(
            LoggingLevel::try_from(42),
            Err(MemlogError::InvalidLevel { value: 42 })
        ));
        assert!(LoggingLevel::Debug < LoggingLevel::Error);
    }

    #[test]
    fn test_logging_level_parse() {
        assert_eq!("warn".parse::<LoggingLevel>().unwrap(), LoggingLevel::Warning);
        assert_eq!("INFO".parse::<LoggingLevel>().unwrap(), LoggingLevel::Info);
        assert_eq!("assert".parse::<LoggingLevel>().unwrap(), LoggingLevel::Fail);
        assert!("loud".parse::<LoggingLevel>().is_err());
    }

    #[test]
    fn test_memory_unit_divisors() {
        assert_eq!(MemoryUnit::Bytes.divisor(), 1);
        assert_eq!(MemoryUnit::Kilobytes.divisor(), 1024);
        assert_eq!(MemoryUnit::Megabytes.divisor(), 1_048_576);

        assert_eq!(MemoryUnit::Bytes.suffix(), "Bytes");
        assert_eq!(MemoryUnit::Kilobytes.suffix(), "KB");
        assert_eq!(MemoryUnit::Megabytes.suffix(), "MB");
    }

    #[test]
    fn test_memory_unit_truncates() {
        assert_eq!(MemoryUnit::Kilobytes.convert(1500), 1);
        assert_eq!(MemoryUnit::Kilobytes.convert(1023), 0);
        assert_eq!(MemoryUnit::Megabytes.convert(2 * 1_048_576 - 1), 1);
        assert_eq!(MemoryUnit::Bytes.convert(1500), 1500);
    }

    #[test]
    fn test_memory_unit_parse() {
        assert_eq!("kb".parse::<MemoryUnit>().unwrap(), MemoryUnit::Kilobytes);
        assert_eq!("Megabytes".parse::<MemoryUnit>().unwrap(), MemoryUnit::Megabytes);
        assert_eq!("b".parse::<MemoryUnit>().unwrap(), MemoryUnit::Bytes);

        let err = "gigabytes".parse::<MemoryUnit>().unwrap_err();
        assert!(err.to_string().contains("bytes, kilobytes, megabytes"));
    }

    #[test]
    fn test_error_arg_text() {
        assert_eq!(ErrorArg::from("plain").text(), Some("plain"));
        assert_eq!(ErrorArg::from(String::from("owned")).text(), Some("owned"));
        assert_eq!(ErrorArg::from(None::<&str>).text(), None);
        assert_eq!(ErrorArg::from(Some("some")).text(), Some("some"));

        let empty = ErrorArg::Failure {
            message: Some(Cow::Borrowed("")),
            description: Cow::Borrowed("Custom { kind: Other }"),
        };
        assert_eq!(empty.text(), Some("Custom { kind: Other }"));

        let missing = ErrorArg::Failure {
            message: None,
            description: Cow::Borrowed("Oops"),
        };
        assert_eq!(missing.text(), Some("Oops"));
    }

    #[test]
    fn test_error_arg_from_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let arg = ErrorArg::from_error(&err);
        assert_eq!(arg.text(), Some("disk full"));

        match arg {
            ErrorArg::Failure { description, .. } => assert!(description.contains("disk full")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_type_tag() {
        struct Widget;
        assert_eq!(type_tag::<Widget>(), "Widget");
        assert_eq!(type_tag::<Vec<String>>(), "Vec");
        assert_eq!(type_tag::<u8>(), "u8");
    }

    #[test]
    fn test_default_trait_methods() {
        let logger = CapturingLogger::new("t");
        logger.d(&42);
        logger.e(ErrorArg::Absent);
        logger.e(ErrorArg::from("bad"));

        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        logger.e_with_cause("open failed", &cause);

        let contents: Vec<_> = logger.records().into_iter().map(|r| r.content).collect();
        assert_eq!(contents, vec!["42", "bad", "open failed => missing"]);
    }

    #[test]
    fn test_forwarding_impls() {
        let logger = CapturingLogger::new("t");
        {
            let by_ref: &dyn Logger = &logger;
            let boxed: Box<&CapturingLogger> = Box::new(&logger);
            by_ref.info("one");
            boxed.warning_tagged("x", "two");
            boxed.set_level(LoggingLevel::Error);
        }
        let shared = Arc::new(CapturingLogger::new("s"));
        shared.fail("three");

        assert_eq!(logger.records().len(), 2);
        assert_eq!(logger.level(), 6);
        assert_eq!(shared.records()[0].method, LogMethod::Fail);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        // save_to_file creates missing parents
        let path = dir.path().join("memlog-rs").join("config.ron");

        let config = MemlogConfig {
            unit: MemoryUnit::Megabytes,
            level: LoggingLevel::Info,
            tag: "app".to_owned(),
            backend: Backend::Console,
            json: true,
        };
        config.save_to_file(&path).unwrap();

        let loaded = MemlogConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_defaults_for_missing_fields() {
        let config: MemlogConfig = ron::from_str("(unit: bytes)").unwrap();
        assert_eq!(config.unit, MemoryUnit::Bytes);
        assert_eq!(config.level, LoggingLevel::Info);
        assert_eq!(config.tag, "memlog");
        assert_eq!(config.backend, Backend::Tracing);
        assert!(!config.json);
    }

    #[test]
    fn test_config_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = MemlogConfig::load_from_file(&dir.path().join("absent.ron"));
        assert!(matches!(missing, Err(MemlogError::Io(_))));

        let path = dir.path().join("bad.ron");
        std::fs::write(&path, "(unit: ").unwrap();
        let bad = MemlogConfig::load_from_file(&path);
        assert!(matches!(bad, Err(MemlogError::Parse { .. })));
    }

    #[test]
    fn test_memlog_error_constructors() {
        let err = MemlogError::parse("Invalid format");
        assert!(matches!(err, MemlogError::Parse { .. }));

        let err = MemlogError::config_with_value("Invalid setting", "bad_value");
        assert!(matches!(err, MemlogError::Config { value: Some(_), .. }));

        let err = MemlogError::memory_unavailable("heap", "no procfs");
        assert!(err.is_memory_unavailable());
        assert_eq!(err.to_string(), "Memory counter 'heap' unavailable: no procfs");

        assert!(!MemlogError::parse("x").is_memory_unavailable());
    }
}
