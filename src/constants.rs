//! Application-wide constants and configuration values.
//!
//! This module defines all static configuration values used throughout
//! tundeck, including timing intervals, tunnel parameters, file paths,
//! and UI messages.

#![allow(dead_code)]

// === Application Metadata ===

/// Application name and title (from Cargo.toml).
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Short technical summary of the application (from Cargo.toml).
pub const APP_SUMMARY: &str = env!("CARGO_PKG_DESCRIPTION");

// === Timing Configuration ===

/// UI refresh rate in milliseconds.
pub const DEFAULT_TICK_RATE: u64 = 250;
/// How long the tunnel worker waits on the command channel before it
/// drains pending backend events, in milliseconds.
pub const SERVICE_POLL_MS: u64 = 250;
/// Toast notification lifetime in seconds.
pub const TOAST_SECS: u64 = 3;

// === Tunnel Parameters ===

/// Maximum Transmission Unit for the tunnel interface.
pub const TUNNEL_MTU: u16 = 1420;
/// Prefix for generated tunnel interface names.
pub const IFACE_PREFIX: &str = "td-";
/// Interface names are capped at 15 bytes on Linux.
pub const IFACE_NAME_MAX: usize = 15;

// === Path Configuration ===

/// Name of the profile definition file inside the config directory.
pub const PROFILES_FILE_NAME: &str = "profiles.toml";
/// Name of the runtime subdirectory holding rendered tunnel configs.
pub const RUNTIME_DIR_NAME: &str = "runtime";

// === UI Messages ===

/// Ready state message.
pub const MSG_READY: &str = "SUCCESS: System active. Press [Enter] to toggle.";
/// Backend initialization message.
pub const MSG_BACKEND_INIT: &str = "IO: Starting tunnel service worker...";
/// Connection in progress message prefix.
pub const MSG_CONNECTING: &str = "Connecting to ";
/// Connection established message prefix.
pub const MSG_CONNECTED: &str = "Connected to ";
/// Disconnection message.
pub const MSG_DISCONNECTED: &str = "Disconnected";
/// Shown when no profile is available to connect.
pub const MSG_NO_PROFILE: &str = "No profile selected";
/// Shown while waiting for the user to grant the privilege prompt.
pub const MSG_PERMISSION_PENDING: &str = "Waiting for permission grant";
/// Shown when the user declines the privilege prompt.
pub const MSG_PERMISSION_DENIED: &str = "Permission denied";
/// Generic placeholder when no data is available.
pub const MSG_NO_DATA: &str = "---";

// === UI Labels & Titles ===

pub const TITLE_PROFILES: &str = " Profiles ";
pub const TITLE_STATUS: &str = " Tunnel ";
pub const TITLE_LOGS: &str = " Activity Log ";
pub const TITLE_PERMISSION: &str = " Permission Required ";
pub const PROMPT_PERMISSION: &str =
    "Establishing a tunnel needs elevated privileges. Continue?";
pub const HINT_PERMISSION: &str = "[y] Grant   [n] Deny";
