//! Memory usage annotation for memlog-rs loggers.
//!
//! This crate wraps any [`memlog_rs_core::Logger`] so that each line carries
//! the current RAM and native heap usage. Memory figures come from a
//! [`MemoryProvider`]; on Linux [`ProcMemoryProvider`] reads them from procfs.
//!
//! # Examples
//!
//! ```rust
//! use memlog_rs_core::{ConsoleLogger, Logger, MemoryUnit};
//! use memlog_rs_memory::MemoryUsageLogger;
//!
//! let logger = MemoryUsageLogger::new(ConsoleLogger::stderr("app"), MemoryUnit::Megabytes);
//! logger.info("cache warmed");
//! ```

pub mod decorator;
pub mod provider;

pub use decorator::MemoryUsageLogger;
pub use provider::{
    FailingMemoryProvider, MemoryCounter, MemoryInfo, MemoryProvider, MemorySnapshot,
    ProcMemoryProvider, StaticMemoryProvider,
};
