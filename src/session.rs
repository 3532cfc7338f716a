//! Session controller: the state machine between the UI and the service.
//!
//! Keyboard intents come in, commands go out to the tunnel service, and
//! status broadcasts come back to overwrite the session state. The
//! controller enforces the toggle rules (no toggling mid-transition, no
//! connecting without a selection or permission) so the UI stays a thin
//! rendering layer.

use std::sync::mpsc::Sender;

use crate::service::{Command, StatusUpdate};
use crate::state::{ConnectionStatus, SessionState, VpnProfile};

/// Session-level failures surfaced directly to the user.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no profile selected")]
    NoProfileSelected,

    #[error("tunnel service unavailable")]
    ServiceUnavailable,
}

pub struct SessionController {
    state: SessionState,
    commands: Sender<Command>,
    permission_granted: bool,
}

impl SessionController {
    #[must_use]
    pub fn new(
        profiles: Vec<VpnProfile>,
        commands: Sender<Command>,
        permission_granted: bool,
    ) -> Self {
        Self {
            state: SessionState::new(profiles),
            commands,
            permission_granted,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    /// Moves the selection to `index`. Out-of-range indexes are ignored.
    ///
    /// Changing the selection never touches an active tunnel; the new choice
    /// takes effect on the next connect.
    pub fn select_profile(&mut self, index: usize) {
        if index < self.state.profiles.len() {
            self.state.selected = Some(index);
        }
    }

    /// Moves the selection up or down by one, clamping at the ends.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.state.profiles.len();
        if len == 0 {
            return;
        }
        let current = self.state.selected.unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(len - 1);
        self.state.selected = Some(next);
    }

    /// Flips the session between connected and disconnected.
    ///
    /// Ignored while a transition is in flight. Connecting without a granted
    /// permission parks the session until [`Self::on_permission_granted`] or
    /// [`Self::on_permission_denied`] resolves it.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoProfileSelected`] when connecting with nothing
    /// selected, [`SessionError::ServiceUnavailable`] when the service worker
    /// is gone.
    pub fn toggle_connection(&mut self) -> Result<(), SessionError> {
        if self.state.status.is_transitioning() {
            return Ok(());
        }

        if self.state.status == ConnectionStatus::Connected {
            self.state.status = ConnectionStatus::Disconnecting;
            return self.send(Command::Disconnect);
        }

        let Some(profile) = self.state.selected_profile().cloned() else {
            self.state.status = ConnectionStatus::Error;
            return Err(SessionError::NoProfileSelected);
        };

        if !self.permission_granted {
            self.state.permission_pending = true;
            return Ok(());
        }

        self.start_connect(profile)
    }

    /// Resumes a parked connect after the user consents.
    ///
    /// # Errors
    ///
    /// Same failures as [`Self::toggle_connection`].
    pub fn on_permission_granted(&mut self) -> Result<(), SessionError> {
        self.permission_granted = true;
        if !self.state.permission_pending {
            return Ok(());
        }
        self.state.permission_pending = false;

        let Some(profile) = self.state.selected_profile().cloned() else {
            self.state.status = ConnectionStatus::Error;
            return Err(SessionError::NoProfileSelected);
        };
        self.start_connect(profile)
    }

    /// Abandons a parked connect. The refusal is an error state; a fresh
    /// toggle starts over.
    pub fn on_permission_denied(&mut self) {
        self.state.permission_pending = false;
        self.state.status = ConnectionStatus::Error;
    }

    /// Applies a service broadcast over the current state, last write wins.
    ///
    /// The update may carry a profile name on any status (the activity log
    /// wants it), but `active_profile` only ever holds a name while the
    /// tunnel is actually up.
    pub fn on_backend_status(&mut self, update: StatusUpdate) {
        self.state.status = update.status;
        self.state.active_profile = if update.status == ConnectionStatus::Connected {
            update.profile
        } else {
            None
        };
    }

    fn start_connect(&mut self, profile: VpnProfile) -> Result<(), SessionError> {
        self.state.status = ConnectionStatus::Connecting;
        self.send(Command::Connect(profile))
    }

    fn send(&mut self, command: Command) -> Result<(), SessionError> {
        if self.commands.send(command).is_err() {
            self.state.status = ConnectionStatus::Error;
            self.state.active_profile = None;
            return Err(SessionError::ServiceUnavailable);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;
    use std::sync::mpsc::{self, Receiver};

    fn controller(granted: bool) -> (SessionController, Receiver<Command>) {
        let (tx, rx) = mpsc::channel();
        (
            SessionController::new(store::builtin_profiles(), tx, granted),
            rx,
        )
    }

    fn update(status: ConnectionStatus, profile: Option<&str>) -> StatusUpdate {
        StatusUpdate {
            status,
            profile: profile.map(String::from),
            detail: None,
        }
    }

    #[test]
    fn test_initial_state_selects_first_profile() {
        let (controller, _rx) = controller(true);
        let state = controller.state();
        assert_eq!(state.status, ConnectionStatus::Disconnected);
        assert_eq!(state.selected, Some(0));
        assert_eq!(state.selected_profile().unwrap().name, "China");
    }

    #[test]
    fn test_toggle_sends_connect_for_selected_profile() {
        let (mut controller, rx) = controller(true);
        controller.select_profile(1);

        controller.toggle_connection().unwrap();

        assert_eq!(controller.state().status, ConnectionStatus::Connecting);
        match rx.try_recv().unwrap() {
            Command::Connect(profile) => assert_eq!(profile.name, "Singapore"),
            Command::Disconnect => panic!("expected a connect command"),
        }
    }

    #[test]
    fn test_toggle_without_selection_is_an_error() {
        let (tx, rx) = mpsc::channel();
        let mut controller = SessionController::new(Vec::new(), tx, true);

        let result = controller.toggle_connection();

        assert_eq!(result.unwrap_err(), SessionError::NoProfileSelected);
        assert_eq!(controller.state().status, ConnectionStatus::Error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_toggle_ignored_while_transitioning() {
        let (mut controller, rx) = controller(true);
        controller.toggle_connection().unwrap();
        let _ = rx.try_recv();

        // Still Connecting; a second toggle must not queue anything
        controller.toggle_connection().unwrap();
        assert!(rx.try_recv().is_err());
        assert_eq!(controller.state().status, ConnectionStatus::Connecting);
    }

    #[test]
    fn test_toggle_while_connected_disconnects() {
        let (mut controller, rx) = controller(true);
        controller.on_backend_status(update(ConnectionStatus::Connected, Some("China")));

        controller.toggle_connection().unwrap();

        assert_eq!(controller.state().status, ConnectionStatus::Disconnecting);
        assert!(matches!(rx.try_recv().unwrap(), Command::Disconnect));
    }

    #[test]
    fn test_connect_parks_until_permission_granted() {
        let (mut controller, rx) = controller(false);

        controller.toggle_connection().unwrap();
        assert!(controller.state().permission_pending);
        assert_eq!(controller.state().status, ConnectionStatus::Disconnected);
        assert!(rx.try_recv().is_err());

        controller.on_permission_granted().unwrap();
        assert!(!controller.state().permission_pending);
        assert_eq!(controller.state().status, ConnectionStatus::Connecting);
        assert!(matches!(rx.try_recv().unwrap(), Command::Connect(_)));
    }

    #[test]
    fn test_permission_denied_is_an_error() {
        let (mut controller, rx) = controller(false);

        controller.toggle_connection().unwrap();
        controller.on_permission_denied();

        assert!(!controller.state().permission_pending);
        assert_eq!(controller.state().status, ConnectionStatus::Error);
        assert!(rx.try_recv().is_err());

        // A fresh toggle starts over from the error state
        controller.on_permission_granted().unwrap();
        controller.toggle_connection().unwrap();
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_grant_without_pending_connect_is_inert() {
        let (mut controller, rx) = controller(false);

        controller.on_permission_granted().unwrap();

        assert!(controller.permission_granted());
        assert_eq!(controller.state().status, ConnectionStatus::Disconnected);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_backend_status_overwrites_state() {
        let (mut controller, _rx) = controller(true);

        controller.on_backend_status(update(ConnectionStatus::Connected, Some("Singapore")));
        assert_eq!(controller.state().status, ConnectionStatus::Connected);
        assert_eq!(controller.state().active_profile.as_deref(), Some("Singapore"));

        controller.on_backend_status(update(ConnectionStatus::Disconnected, None));
        assert_eq!(controller.state().status, ConnectionStatus::Disconnected);
        assert!(controller.state().active_profile.is_none());
    }

    #[test]
    fn test_active_profile_unset_while_connecting() {
        let (mut controller, _rx) = controller(true);

        controller.toggle_connection().unwrap();
        assert_eq!(controller.state().status, ConnectionStatus::Connecting);
        assert!(controller.state().active_profile.is_none());

        controller.on_backend_status(update(ConnectionStatus::Connecting, Some("China")));
        assert!(controller.state().active_profile.is_none());
    }

    #[test]
    fn test_error_status_clears_active_profile() {
        let (mut controller, _rx) = controller(true);
        controller.on_backend_status(update(ConnectionStatus::Connected, Some("China")));

        // A failed attempt names the profile for the log, but no tunnel is up
        controller.on_backend_status(update(ConnectionStatus::Error, Some("China")));

        assert_eq!(controller.state().status, ConnectionStatus::Error);
        assert!(controller.state().active_profile.is_none());
    }

    #[test]
    fn test_selection_change_never_sends_commands() {
        let (mut controller, rx) = controller(true);
        controller.on_backend_status(update(ConnectionStatus::Connected, Some("China")));

        controller.select_profile(1);
        controller.move_selection(-1);

        assert!(rx.try_recv().is_err());
        assert_eq!(controller.state().status, ConnectionStatus::Connected);
    }

    #[test]
    fn test_move_selection_clamps_at_ends() {
        let (mut controller, _rx) = controller(true);

        controller.move_selection(-1);
        assert_eq!(controller.state().selected, Some(0));

        controller.move_selection(1);
        controller.move_selection(1);
        controller.move_selection(1);
        assert_eq!(controller.state().selected, Some(1));
    }

    #[test]
    fn test_dropped_service_reports_unavailable() {
        let (mut controller, rx) = controller(true);
        drop(rx);

        let result = controller.toggle_connection();

        assert_eq!(result.unwrap_err(), SessionError::ServiceUnavailable);
        assert_eq!(controller.state().status, ConnectionStatus::Error);
    }
}
