//! Process memory figures for the health endpoint.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    /// Peak resident set size in bytes, when the platform reports it.
    pub max_rss_bytes: Option<u64>,
}

/// Read resource usage for the current process.
pub fn current() -> MemoryUsage {
    MemoryUsage {
        max_rss_bytes: max_rss_bytes(),
    }
}

#[cfg(unix)]
fn max_rss_bytes() -> Option<u64> {
    use std::mem::MaybeUninit;

    let mut usage = MaybeUninit::<libc::rusage>::uninit();
    // Safety: getrusage only writes into the provided struct.
    let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if ret != 0 {
        return None;
    }
    let usage = unsafe { usage.assume_init() };
    let max_rss = u64::try_from(usage.ru_maxrss).ok()?;

    // Linux reports kilobytes, macOS reports bytes.
    if cfg!(target_os = "macos") {
        Some(max_rss)
    } else {
        Some(max_rss * 1024)
    }
}

#[cfg(not(unix))]
fn max_rss_bytes() -> Option<u64> {
    None
}
