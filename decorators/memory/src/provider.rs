//! Memory snapshot providers.
//!
//! A [`MemoryProvider`] exposes the four counters the decorator reports.
//! [`ProcMemoryProvider`] reads them from Linux procfs. The static and failing
//! providers return fixed values and are meant for tests.

use memlog_rs_core::{MemlogError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The four memory counters, in the order the decorator reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryCounter {
    Total,
    Free,
    NativeHeap,
    Max,
}

impl fmt::Display for MemoryCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Total => "total",
            Self::Free => "free",
            Self::NativeHeap => "native_heap",
            Self::Max => "max",
        };
        f.write_str(name)
    }
}

/// One reading of all four counters, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemorySnapshot {
    pub total: u64,
    pub free: u64,
    pub native_heap: u64,
    pub max: u64,
}

/// Source of memory figures, all in bytes.
///
/// Each accessor may fail independently, e.g. when the host does not expose
/// the counter.
pub trait MemoryProvider {
    /// Memory currently claimed.
    fn total_memory(&self) -> Result<u64>;

    /// Part of [`total_memory`](Self::total_memory) that is still free.
    fn free_memory(&self) -> Result<u64>;

    /// Upper bound memory may grow to.
    fn max_memory(&self) -> Result<u64>;

    /// Bytes allocated on the native heap of this process.
    fn native_heap_allocated(&self) -> Result<u64>;

    /// Read every counter in [`MemoryCounter`] order, stopping at the first
    /// failure.
    ///
    /// Providers that can read several counters from one source should
    /// override this so the figures come from the same moment.
    fn snapshot(&self) -> Result<MemorySnapshot> {
        Ok(MemorySnapshot {
            total: self.total_memory()?,
            free: self.free_memory()?,
            native_heap: self.native_heap_allocated()?,
            max: self.max_memory()?,
        })
    }
}

impl<P: MemoryProvider + ?Sized> MemoryProvider for &P {
    fn total_memory(&self) -> Result<u64> {
        (**self).total_memory()
    }

    fn free_memory(&self) -> Result<u64> {
        (**self).free_memory()
    }

    fn max_memory(&self) -> Result<u64> {
        (**self).max_memory()
    }

    fn native_heap_allocated(&self) -> Result<u64> {
        (**self).native_heap_allocated()
    }

    fn snapshot(&self) -> Result<MemorySnapshot> {
        (**self).snapshot()
    }
}

/// System memory statistics from `/proc/meminfo`.
///
/// All values are in bytes for consistency and easier calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryInfo {
    /// Total physical memory
    pub mem_total: u64,
    /// Free physical memory
    pub mem_free: u64,
    /// Available physical memory (free + reclaimable)
    pub mem_available: u64,
    /// Memory used for buffers
    pub mem_buffers: u64,
    /// Memory used for page cache
    pub mem_cached: u64,
    /// Total swap space
    pub swap_total: u64,
}

impl MemoryInfo {
    /// Physical plus swap capacity, `None` if the sum overflows.
    #[must_use]
    pub const fn capacity_with_swap(&self) -> Option<u64> {
        self.mem_total.checked_add(self.swap_total)
    }

    /// Parse memory information from a meminfo file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse memory information from meminfo content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut info = Self::default();

        for line in content.lines() {
            let Some((key, value_bytes)) = parse_kb_line(line)? else {
                continue;
            };

            match key {
                "MemTotal" => info.mem_total = value_bytes,
                "MemFree" => info.mem_free = value_bytes,
                "MemAvailable" => info.mem_available = value_bytes,
                "Buffers" => info.mem_buffers = value_bytes,
                "Cached" => info.mem_cached = value_bytes,
                "SwapTotal" => info.swap_total = value_bytes,
                _ => {}
            }
        }

        // Kernels before 3.14 have no MemAvailable
        if info.mem_available == 0 {
            info.mem_available = info
                .mem_free
                .checked_add(info.mem_buffers)
                .and_then(|sum| sum.checked_add(info.mem_cached))
                .ok_or_else(|| MemlogError::parse("MemAvailable estimate out of range"))?;
        }

        Ok(info)
    }
}

/// Split a `Key:   123 kB` line into its key and byte count.
fn parse_kb_line(line: &str) -> Result<Option<(&str, u64)>> {
    let mut parts = line.split_whitespace();
    let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
        return Ok(None);
    };
    let key = key.trim_end_matches(':');
    let value = value
        .parse::<u64>()
        .map_err(|e| MemlogError::parse_with_source(format!("Failed to parse {} value", key), e))?;

    // procfs reports kB
    let bytes = value
        .checked_mul(1024)
        .ok_or_else(|| MemlogError::parse(format!("{} value out of range", key)))?;
    Ok(Some((key, bytes)))
}

/// Read one `kB` field such as `VmData` from `/proc/<pid>/status` content.
pub fn parse_status_field(content: &str, field: &str) -> Result<Option<u64>> {
    for line in content.lines() {
        if !line.starts_with(field) {
            continue;
        }
        if let Some((key, value_bytes)) = parse_kb_line(line)? {
            if key == field {
                return Ok(Some(value_bytes));
            }
        }
    }
    Ok(None)
}

/// Host provider backed by Linux procfs.
///
/// - total: `MemTotal`
/// - free: `MemAvailable` (estimated on older kernels)
/// - max: `MemTotal + SwapTotal`
/// - native heap: `VmData` of the current process
///
/// Files are re-read on every call so each log line gets a fresh snapshot.
#[derive(Debug, Clone)]
pub struct ProcMemoryProvider {
    meminfo_path: PathBuf,
    status_path: PathBuf,
}

impl ProcMemoryProvider {
    const PROC_MEMINFO_PATH: &'static str = "/proc/meminfo";
    const PROC_STATUS_PATH: &'static str = "/proc/self/status";

    pub fn new() -> Self {
        Self::with_paths(Self::PROC_MEMINFO_PATH, Self::PROC_STATUS_PATH)
    }

    /// Read from other files (useful for testing).
    pub fn with_paths(meminfo: impl Into<PathBuf>, status: impl Into<PathBuf>) -> Self {
        Self {
            meminfo_path: meminfo.into(),
            status_path: status.into(),
        }
    }

    fn meminfo(&self, counter: MemoryCounter) -> Result<MemoryInfo> {
        let info = MemoryInfo::from_path(&self.meminfo_path)?;
        if info.mem_total == 0 {
            return Err(MemlogError::memory_unavailable(
                counter.to_string(),
                format!("MemTotal missing from {}", self.meminfo_path.display()),
            ));
        }
        Ok(info)
    }

    fn capacity(info: &MemoryInfo) -> Result<u64> {
        info.capacity_with_swap().ok_or_else(|| {
            MemlogError::memory_unavailable(
                MemoryCounter::Max.to_string(),
                "MemTotal + SwapTotal out of range",
            )
        })
    }

    /// Check that both procfs files exist and parse.
    pub fn check_availability(&self) -> Result<()> {
        for path in [&self.meminfo_path, &self.status_path] {
            if !path.exists() {
                return Err(MemlogError::memory_unavailable(
                    "all",
                    format!("{} does not exist (not a Linux system?)", path.display()),
                ));
            }
        }

        self.total_memory()?;
        self.native_heap_allocated()?;
        Ok(())
    }
}

impl Default for ProcMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider for ProcMemoryProvider {
    fn total_memory(&self) -> Result<u64> {
        Ok(self.meminfo(MemoryCounter::Total)?.mem_total)
    }

    fn free_memory(&self) -> Result<u64> {
        Ok(self.meminfo(MemoryCounter::Free)?.mem_available)
    }

    fn max_memory(&self) -> Result<u64> {
        Self::capacity(&self.meminfo(MemoryCounter::Max)?)
    }

    fn native_heap_allocated(&self) -> Result<u64> {
        let content = fs::read_to_string(&self.status_path)?;
        parse_status_field(&content, "VmData")?.ok_or_else(|| {
            MemlogError::memory_unavailable(
                MemoryCounter::NativeHeap.to_string(),
                format!("VmData missing from {}", self.status_path.display()),
            )
        })
    }

    /// Reads `/proc/meminfo` once for total, free and max.
    fn snapshot(&self) -> Result<MemorySnapshot> {
        let info = self.meminfo(MemoryCounter::Total)?;
        Ok(MemorySnapshot {
            total: info.mem_total,
            free: info.mem_available,
            native_heap: self.native_heap_allocated()?,
            max: Self::capacity(&info)?,
        })
    }
}

/// Provider returning fixed byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticMemoryProvider {
    pub total: u64,
    pub free: u64,
    pub max: u64,
    pub native_heap: u64,
}

impl MemoryProvider for StaticMemoryProvider {
    fn total_memory(&self) -> Result<u64> {
        Ok(self.total)
    }

    fn free_memory(&self) -> Result<u64> {
        Ok(self.free)
    }

    fn max_memory(&self) -> Result<u64> {
        Ok(self.max)
    }

    fn native_heap_allocated(&self) -> Result<u64> {
        Ok(self.native_heap)
    }
}

/// Provider that fails on one counter, or on all of them.
#[derive(Debug, Clone, Copy)]
pub struct FailingMemoryProvider {
    values: StaticMemoryProvider,
    failing: Option<MemoryCounter>,
}

impl FailingMemoryProvider {
    /// Fail every read.
    pub fn always() -> Self {
        Self {
            values: StaticMemoryProvider::default(),
            failing: None,
        }
    }

    /// Serve `values` except for `counter`, which fails.
    pub fn on(counter: MemoryCounter, values: StaticMemoryProvider) -> Self {
        Self {
            values,
            failing: Some(counter),
        }
    }

    fn read(&self, counter: MemoryCounter, value: u64) -> Result<u64> {
        match self.failing {
            Some(failing) if failing != counter => Ok(value),
            _ => Err(MemlogError::memory_unavailable(
                counter.to_string(),
                "counter disabled",
            )),
        }
    }
}

impl MemoryProvider for FailingMemoryProvider {
    fn total_memory(&self) -> Result<u64> {
        self.read(MemoryCounter::Total, self.values.total)
    }

    fn free_memory(&self) -> Result<u64> {
        self.read(MemoryCounter::Free, self.values.free)
    }

    fn max_memory(&self) -> Result<u64> {
        self.read(MemoryCounter::Max, self.values.max)
    }

    fn native_heap_allocated(&self) -> Result<u64> {
        self.read(MemoryCounter::NativeHeap, self.values.native_heap)
    }
}
