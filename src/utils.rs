//! Small shared helpers for paths, timestamps, and privilege detection.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the tundeck configuration directory (`~/.config/tundeck`).
///
/// The directory is not created here; callers that write into it create
/// it on demand.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(crate::constants::APP_NAME))
}

/// Formats the current UTC time of day as `HH:MM:SS` for log lines.
///
/// Good enough for a log prefix without pulling in a date-time crate.
pub fn format_log_time() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let day_secs = secs % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        day_secs / 3600,
        (day_secs % 3600) / 60,
        day_secs % 60
    )
}

/// Returns true when the process runs with root privileges.
#[cfg(unix)]
#[allow(unsafe_code)]
pub fn is_root() -> bool {
    // geteuid is always safe to call
    unsafe { libc::geteuid() == 0 }
}

/// Non-unix builds never report root; the permission prompt always runs.
#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}
