//! Connection status and session state types.

use crate::state::VpnProfile;

/// VPN connection state machine values.
///
/// Exactly one value holds at any time. The session controller is the sole
/// writer; the UI only observes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No active VPN connection.
    #[default]
    Disconnected,
    /// Connection attempt in progress.
    Connecting,
    /// Active VPN connection established.
    Connected,
    /// Disconnection in progress.
    Disconnecting,
    /// The last attempt failed; a fresh toggle is required.
    Error,
}

impl ConnectionStatus {
    /// True while a transition is in flight and toggles are ignored.
    #[must_use]
    pub const fn is_transitioning(self) -> bool {
        matches!(self, Self::Connecting | Self::Disconnecting)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Disconnected => "DISCONNECTED",
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Disconnecting => "DISCONNECTING",
            Self::Error => "ERROR",
        };
        write!(f, "{label}")
    }
}

/// All session state owned by the session controller.
///
/// Lives for the process lifetime. `status` and `active_profile` are mutated
/// only by user toggle intents and asynchronous service notifications;
/// `selected` only by explicit user selection.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Current connection status.
    pub status: ConnectionStatus,
    /// Display name of the profile the tunnel refers to; cleared once
    /// disconnected.
    pub active_profile: Option<String>,
    /// Ordered profile collection, seeded by the configuration store.
    pub profiles: Vec<VpnProfile>,
    /// Index of the selected profile; defaults to the first loaded profile.
    pub selected: Option<usize>,
    /// True while waiting for the user to grant the privilege prompt.
    pub permission_pending: bool,
}

impl SessionState {
    /// Creates session state seeded with the given profiles, selecting the
    /// first one when available.
    #[must_use]
    pub fn new(profiles: Vec<VpnProfile>) -> Self {
        let selected = if profiles.is_empty() { None } else { Some(0) };
        Self {
            status: ConnectionStatus::Disconnected,
            active_profile: None,
            profiles,
            selected,
            permission_pending: false,
        }
    }

    /// The currently selected profile, if any.
    #[must_use]
    pub fn selected_profile(&self) -> Option<&VpnProfile> {
        self.selected.and_then(|i| self.profiles.get(i))
    }
}
