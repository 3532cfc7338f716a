//! Session and profile state types.

mod profile;
mod session;

pub use profile::VpnProfile;
pub use session::{ConnectionStatus, SessionState};
