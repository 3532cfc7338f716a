//! Core application state and logic.
//!
//! This module contains the main [`App`] struct that wires keyboard input to
//! the session controller, drains service status broadcasts on every tick,
//! and keeps the activity log and toast state the dashboard renders.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::constants;
use crate::service::StatusUpdate;
use crate::session::{SessionController, SessionError};
use crate::state::ConnectionStatus;

/// Toast notification for temporary messages.
#[derive(Clone)]
pub struct Toast {
    /// Message to display.
    pub message: String,
    /// When the toast should disappear.
    pub expires: Instant,
}

/// Main application state container.
pub struct App {
    /// Session controller driving the tunnel state machine.
    pub controller: SessionController,
    /// Status broadcasts from the tunnel service worker.
    status_rx: Receiver<StatusUpdate>,
    /// Persistent activity log lines.
    pub logs: Vec<String>,
    /// Scroll offset into the activity log.
    pub logs_scroll: u16,
    /// Whether the log view follows the newest entry.
    pub logs_auto_scroll: bool,
    /// Selection state for the profile sidebar table.
    pub table_state: TableState,
    /// Active toast notification, if any.
    pub toast: Option<Toast>,
    /// Set when the user asks to exit.
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(controller: SessionController, status_rx: Receiver<StatusUpdate>) -> Self {
        let mut table_state = TableState::default();
        table_state.select(controller.state().selected);

        let mut app = Self {
            controller,
            status_rx,
            logs: Vec::new(),
            logs_scroll: 0,
            logs_auto_scroll: true,
            table_state,
            toast: None,
            should_quit: false,
        };
        app.log(constants::MSG_BACKEND_INIT);
        app.log(constants::MSG_READY);
        app
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        // The permission prompt captures all input until resolved
        if self.controller.state().permission_pending {
            self.handle_permission_keys(key);
            return;
        }

        // Global: Quit
        if key.code == KeyCode::Char('q')
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.controller.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.controller.move_selection(1),
            KeyCode::Char(c @ '1'..='9') => {
                let slot = (c as usize) - ('1' as usize);
                self.controller.select_profile(slot);
            }
            KeyCode::Enter | KeyCode::Char('t') => self.toggle_connection(),
            KeyCode::PageUp => {
                self.logs_auto_scroll = false;
                self.logs_scroll = self.logs_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                self.logs_scroll = self.logs_scroll.saturating_add(5);
                self.resume_auto_scroll();
            }
            _ => {}
        }

        self.sync_table_selection();
    }

    fn handle_permission_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.log("Permission granted");
                if let Err(err) = self.controller.on_permission_granted() {
                    self.show_toast(err.to_string());
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.controller.on_permission_denied();
                self.show_toast(constants::MSG_PERMISSION_DENIED.to_string());
            }
            _ => {}
        }
    }

    fn toggle_connection(&mut self) {
        match self.controller.toggle_connection() {
            Ok(()) => {
                if self.controller.state().permission_pending {
                    self.log(constants::MSG_PERMISSION_PENDING);
                }
            }
            Err(SessionError::NoProfileSelected) => {
                self.show_toast(constants::MSG_NO_PROFILE.to_string());
            }
            Err(err @ SessionError::ServiceUnavailable) => {
                self.show_toast(err.to_string());
            }
        }
    }

    /// Called on each UI tick.
    pub fn on_tick(&mut self) {
        // Apply pending service broadcasts
        while let Ok(update) = self.status_rx.try_recv() {
            self.log_status(&update);
            self.controller.on_backend_status(update);
        }

        // Expire toast
        if let Some(ref toast) = self.toast {
            if Instant::now() > toast.expires {
                self.toast = None;
            }
        }

        self.sync_table_selection();
    }

    fn log_status(&mut self, update: &StatusUpdate) {
        let name = update.profile.as_deref().unwrap_or(constants::MSG_NO_DATA);
        match update.status {
            ConnectionStatus::Connecting => {
                self.log(&format!("{}{name}...", constants::MSG_CONNECTING));
            }
            ConnectionStatus::Connected => {
                self.show_toast(format!("{}{name}", constants::MSG_CONNECTED));
            }
            ConnectionStatus::Disconnecting => {
                self.log(&format!("Disconnecting from {name}..."));
            }
            ConnectionStatus::Disconnected => {
                self.log(constants::MSG_DISCONNECTED);
            }
            ConnectionStatus::Error => {
                self.show_toast(format!("Tunnel error ({name})"));
            }
        }

        // Failure detail from the service (suppressed teardown errors etc.)
        if let Some(detail) = &update.detail {
            self.log(&format!("WARN: {detail}"));
        }
    }

    /// Show a toast notification and log it
    pub fn show_toast(&mut self, message: String) {
        self.log(&message);
        self.toast = Some(Toast {
            expires: Instant::now() + Duration::from_secs(constants::TOAST_SECS),
            message,
        });
    }

    /// Add a message to the persistent log
    pub fn log(&mut self, message: &str) {
        let timestamp = crate::utils::format_log_time();
        self.logs.push(format!("{timestamp} {message}"));

        // Keep only the most recent entries
        if self.logs.len() > 1000 {
            self.logs.remove(0);
        }

        if self.logs_auto_scroll {
            #[allow(clippy::cast_possible_truncation)]
            let scroll = self.logs.len().saturating_sub(1) as u16;
            self.logs_scroll = scroll;
        }
    }

    fn resume_auto_scroll(&mut self) {
        #[allow(clippy::cast_possible_truncation)]
        let end = self.logs.len().saturating_sub(1) as u16;
        if self.logs_scroll >= end {
            self.logs_scroll = end;
            self.logs_auto_scroll = true;
        }
    }

    fn sync_table_selection(&mut self) {
        self.table_state.select(self.controller.state().selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;
    use std::sync::mpsc::{self, Sender};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_permission(granted: bool) -> (App, mpsc::Receiver<crate::service::Command>, Sender<StatusUpdate>) {
        let (command_tx, command_rx) = mpsc::channel();
        let (status_tx, status_rx) = mpsc::channel();
        let controller = SessionController::new(store::builtin_profiles(), command_tx, granted);
        (App::new(controller, status_rx), command_rx, status_tx)
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _rx, _tx) = app_with_permission(true);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_enter_toggles_selected_profile() {
        let (mut app, command_rx, _tx) = app_with_permission(true);

        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.controller.state().status, ConnectionStatus::Connecting);
        assert!(command_rx.try_recv().is_ok());
    }

    #[test]
    fn test_permission_prompt_consumes_keys() {
        let (mut app, command_rx, _tx) = app_with_permission(false);

        app.handle_key(key(KeyCode::Enter));
        assert!(app.controller.state().permission_pending);

        // 'q' must not quit while the prompt is open
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Char('y')));
        assert!(!app.controller.state().permission_pending);
        assert!(command_rx.try_recv().is_ok());
    }

    #[test]
    fn test_permission_denied_shows_toast() {
        let (mut app, command_rx, _tx) = app_with_permission(false);

        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('n')));

        assert!(!app.controller.state().permission_pending);
        assert!(command_rx.try_recv().is_err());
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some(constants::MSG_PERMISSION_DENIED)
        );
    }

    #[test]
    fn test_tick_applies_status_updates() {
        let (mut app, _rx, status_tx) = app_with_permission(true);

        status_tx
            .send(StatusUpdate {
                status: ConnectionStatus::Connected,
                profile: Some("China".into()),
                detail: None,
            })
            .unwrap();
        app.on_tick();

        assert_eq!(app.controller.state().status, ConnectionStatus::Connected);
        assert!(app.logs.iter().any(|line| line.contains("Connected to China")));
    }

    #[test]
    fn test_tick_logs_failure_detail() {
        let (mut app, _rx, status_tx) = app_with_permission(true);

        status_tx
            .send(StatusUpdate {
                status: ConnectionStatus::Disconnected,
                profile: None,
                detail: Some("wg-quick exited with exit status: 1".into()),
            })
            .unwrap();
        app.on_tick();

        assert_eq!(app.controller.state().status, ConnectionStatus::Disconnected);
        assert!(app
            .logs
            .iter()
            .any(|line| line.contains("WARN: wg-quick exited")));
    }

    #[test]
    fn test_number_keys_select_profiles() {
        let (mut app, _rx, _tx) = app_with_permission(true);

        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.controller.state().selected, Some(1));
        assert_eq!(app.table_state.selected(), Some(1));

        // Out-of-range slots leave the selection alone
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.controller.state().selected, Some(1));
    }
}
