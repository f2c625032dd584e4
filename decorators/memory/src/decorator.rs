//! Logger decorator that prefixes every line with memory statistics.
//!
//! Lines are rewritten as
//!
//! ```text
//! Current memory stats RAM used = {total - free}{unit}/{max}{unit}; HEAP used = {heap}{unit} FOR {content}
//! ```
//!
//! and handed to the wrapped logger. When the counters cannot be read the
//! line becomes `Can't determine memory usage FOR {content}` instead.

use crate::provider::{MemoryProvider, ProcMemoryProvider};
use memlog_rs_core::{ErrorArg, Logger, LoggingLevel, MemoryUnit, Result, LOG_TARGET};
use std::fmt;

/// Wraps any [`Logger`] and annotates each line with memory usage.
///
/// The wrapped logger can be owned or borrowed (`&L` is a logger too). The
/// decorator never manages its lifecycle and keeps no state between calls.
///
/// # Examples
///
/// ```rust
/// use memlog_rs_core::{CapturingLogger, Logger, MemoryUnit};
/// use memlog_rs_memory::{MemoryUsageLogger, StaticMemoryProvider};
///
/// let inner = CapturingLogger::new("app");
/// let provider = StaticMemoryProvider {
///     total: 2_097_152,
///     free: 1_048_576,
///     max: 4_194_304,
///     native_heap: 524_288,
/// };
/// let logger = MemoryUsageLogger::with_provider(&inner, MemoryUnit::Kilobytes, provider);
///
/// logger.debug("loading");
/// assert_eq!(
///     inner.last().unwrap().content,
///     "Current memory stats RAM used = 1024KB/4096KB; HEAP used = 512KB FOR loading"
/// );
/// ```
#[derive(Debug)]
pub struct MemoryUsageLogger<L, P = ProcMemoryProvider> {
    logger: L,
    unit: MemoryUnit,
    provider: P,
}

impl<L: Logger> MemoryUsageLogger<L> {
    /// Decorate `logger`, reading memory from the host.
    pub fn new(logger: L, unit: MemoryUnit) -> Self {
        Self::with_provider(logger, unit, ProcMemoryProvider::new())
    }
}

impl<L: Logger, P: MemoryProvider> MemoryUsageLogger<L, P> {
    /// Decorate `logger`, reading memory from `provider`.
    pub fn with_provider(logger: L, unit: MemoryUnit, provider: P) -> Self {
        Self {
            logger,
            unit,
            provider,
        }
    }

    pub fn unit(&self) -> MemoryUnit {
        self.unit
    }

    /// The wrapped logger.
    pub fn inner(&self) -> &L {
        &self.logger
    }

    pub fn into_inner(self) -> L {
        self.logger
    }

    /// Annotate `content` with the current memory figures.
    ///
    /// Never fails: unreadable counters produce the fallback line.
    pub fn details(&self, content: &str) -> String {
        match self.memory_stats() {
            Ok(stats) => format!("{stats} FOR {content}"),
            Err(error) => {
                tracing::debug!(target: LOG_TARGET, %error, "memory introspection failed");
                format!("Can't determine memory usage FOR {content}")
            }
        }
    }

    fn memory_stats(&self) -> Result<MemoryStats> {
        let unit = self.unit;
        let snapshot = self.provider.snapshot()?;
        let total = unit.convert(snapshot.total);
        let free = unit.convert(snapshot.free);
        let heap = unit.convert(snapshot.native_heap);
        let max = unit.convert(snapshot.max);

        Ok(MemoryStats {
            used: total.saturating_sub(free),
            max,
            heap,
            unit,
        })
    }
}

/// Memory figures already converted to the display unit.
struct MemoryStats {
    used: u64,
    max: u64,
    heap: u64,
    unit: MemoryUnit,
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = self.unit.suffix();
        write!(
            f,
            "Current memory stats RAM used = {}{suffix}/{}{suffix}; HEAP used = {}{suffix}",
            self.used, self.max, self.heap
        )
    }
}

impl<L: Logger, P: MemoryProvider> Logger for MemoryUsageLogger<L, P> {
    fn verbose(&self, content: &str) {
        self.logger.verbose(&self.details(content));
    }

    fn verbose_tagged(&self, tag: &str, content: &str) {
        self.logger.verbose_tagged(tag, &self.details(content));
    }

    fn debug(&self, content: &str) {
        self.logger.debug(&self.details(content));
    }

    fn debug_tagged(&self, tag: &str, content: &str) {
        self.logger.debug_tagged(tag, &self.details(content));
    }

    fn info(&self, content: &str) {
        self.logger.info(&self.details(content));
    }

    fn info_tagged(&self, tag: &str, content: &str) {
        self.logger.info_tagged(tag, &self.details(content));
    }

    fn warning(&self, content: &str) {
        self.logger.warning(&self.details(content));
    }

    fn warning_tagged(&self, tag: &str, content: &str) {
        self.logger.warning_tagged(tag, &self.details(content));
    }

    fn error(&self, content: &str) {
        self.logger.error(&self.details(content));
    }

    fn error_tagged(&self, tag: &str, content: &str) {
        self.logger.error_tagged(tag, &self.details(content));
    }

    fn fail(&self, content: &str) {
        self.logger.fail(&self.details(content));
    }

    fn fail_tagged(&self, tag: &str, content: &str) {
        self.logger.fail_tagged(tag, &self.details(content));
    }

    fn d(&self, message: &dyn fmt::Display) {
        self.debug(&message.to_string());
    }

    /// Error-log a message or error value through [`error`](Logger::error).
    ///
    /// An error with an empty message is logged by its description, and
    /// [`ErrorArg::Absent`] is ignored.
    fn e(&self, arg: ErrorArg<'_>) {
        if let Some(text) = arg.text() {
            self.error(text);
        }
    }

    fn e_with_cause(&self, message: &str, cause: &dyn std::error::Error) {
        self.logger
            .error(&self.details(&format!("{message} => {cause}")));
    }

    fn set_level(&self, level: LoggingLevel) {
        self.logger.set_level(level);
    }

    fn set_level_raw(&self, level: i32) {
        self.logger.set_level_raw(level);
    }

    fn level(&self) -> i32 {
        self.logger.level()
    }

    fn tag_for(&self, instance: &str) -> String {
        self.logger.tag_for(instance)
    }

    /// Always the decorator itself, whatever the instance.
    fn logger_for(&self, _instance: &str) -> &dyn Logger {
        self
    }
}
