//! Tunnel service: owns the platform interface and backend tunnel lifecycle.
//!
//! The service runs on its own worker thread. The UI sends [`Command`]s in
//! and drains [`StatusUpdate`]s out on every tick; nothing inside the service
//! ever touches the terminal. The worker holds at most one active tunnel and
//! guarantees the platform interface is released on every teardown and
//! failure path.

pub mod backend;
pub mod config;
pub mod platform;

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::constants::SERVICE_POLL_MS;
use crate::service::backend::{BackendError, BackendEvent, TunnelBackend, TunnelHandle};
use crate::service::config::{ConfigError, TunnelConfig};
use crate::service::platform::{InterfaceRequest, Platform, TunnelInterface};
use crate::state::{ConnectionStatus, VpnProfile};

/// Requests the UI can make of the tunnel service.
#[derive(Debug)]
pub enum Command {
    /// Bring a tunnel up for the given profile.
    Connect(VpnProfile),
    /// Tear the active tunnel down.
    Disconnect,
}

/// One status broadcast from the service worker.
///
/// Updates are last-write-wins: the receiver applies each one over the
/// previous without merging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: ConnectionStatus,
    /// Profile name the update refers to, when one is in play.
    pub profile: Option<String>,
    /// Failure detail for the activity log; the status value alone stays
    /// the source of truth for the state machine.
    pub detail: Option<String>,
}

/// Failures raised while standing a tunnel up.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid profile configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("tunnel interface unavailable: {0}")]
    InterfaceUnavailable(#[from] io::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Handle-free facade over the service worker thread.
pub struct TunnelService;

impl TunnelService {
    /// Spawns the worker thread and returns its command and status channels.
    ///
    /// The worker exits, tearing down any active tunnel, when the command
    /// sender is dropped.
    #[must_use]
    pub fn spawn(
        platform: Box<dyn Platform>,
        backend: Box<dyn TunnelBackend>,
    ) -> (Sender<Command>, Receiver<StatusUpdate>) {
        let (command_tx, command_rx) = mpsc::channel();
        let (status_tx, status_rx) = mpsc::channel();

        thread::Builder::new()
            .name("tunnel-service".into())
            .spawn(move || {
                let mut worker = Worker::new(platform, backend, status_tx);
                worker.run(&command_rx);
            })
            .ok();

        (command_tx, status_rx)
    }
}

/// A tunnel that is currently provisioned.
struct ActiveTunnel {
    profile_name: String,
    interface: Box<dyn TunnelInterface>,
    handle: Box<dyn TunnelHandle>,
}

struct Worker {
    platform: Box<dyn Platform>,
    backend: Box<dyn TunnelBackend>,
    status: Sender<StatusUpdate>,
    events_tx: Sender<BackendEvent>,
    events_rx: Receiver<BackendEvent>,
    active: Option<ActiveTunnel>,
}

impl Worker {
    fn new(
        platform: Box<dyn Platform>,
        backend: Box<dyn TunnelBackend>,
        status: Sender<StatusUpdate>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            platform,
            backend,
            status,
            events_tx,
            events_rx,
            active: None,
        }
    }

    fn run(&mut self, commands: &Receiver<Command>) {
        loop {
            match commands.recv_timeout(Duration::from_millis(SERVICE_POLL_MS)) {
                Ok(Command::Connect(profile)) => self.connect(&profile),
                Ok(Command::Disconnect) => self.disconnect(),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.teardown();
                    break;
                }
            }
            self.pump_events();
        }
    }

    fn connect(&mut self, profile: &VpnProfile) {
        if let Some(active) = &self.active {
            if active.handle.is_up() {
                // Something is already up; report it instead of stacking a
                // second tunnel.
                self.emit(ConnectionStatus::Connected, Some(active.profile_name.clone()));
                return;
            }
        }

        self.emit(ConnectionStatus::Connecting, Some(profile.name.clone()));

        match self.try_connect(profile) {
            Ok(active) => {
                self.active = Some(active);
            }
            Err(err) => {
                self.drain_events();
                self.emit_with_detail(
                    ConnectionStatus::Error,
                    Some(profile.name.clone()),
                    Some(err.to_string()),
                );
            }
        }
    }

    fn try_connect(&mut self, profile: &VpnProfile) -> Result<ActiveTunnel, ServiceError> {
        let config = TunnelConfig::from_profile(profile)?;
        let request = InterfaceRequest::new(&profile.id, &config);

        let mut interface = self.platform.establish(&request)?;

        let mut handle =
            match self
                .backend
                .create(interface.as_ref(), &config, self.events_tx.clone())
            {
                Ok(handle) => handle,
                Err(err) => {
                    interface.release();
                    return Err(err.into());
                }
            };

        if let Err(err) = handle.start() {
            interface.release();
            return Err(err.into());
        }

        Ok(ActiveTunnel {
            profile_name: profile.name.clone(),
            interface,
            handle,
        })
    }

    fn disconnect(&mut self) {
        let Some(mut active) = self.active.take() else {
            self.emit(ConnectionStatus::Disconnected, None);
            return;
        };

        self.emit(ConnectionStatus::Disconnecting, Some(active.profile_name.clone()));

        // Teardown continues past a failed stop; the interface is never
        // leaked. The failure still travels with the final update so the
        // activity log records it.
        let detail = active.handle.stop().err().map(|err| err.to_string());
        active.interface.release();

        self.drain_events();
        self.emit_with_detail(ConnectionStatus::Disconnected, None, detail);
    }

    /// Final teardown when the command channel hangs up.
    fn teardown(&mut self) {
        if let Some(mut active) = self.active.take() {
            let _ = active.handle.stop();
            active.interface.release();
        }
    }

    /// Forwards pending backend events as status updates.
    fn pump_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                BackendEvent::Up => {
                    let name = self.active.as_ref().map(|a| a.profile_name.clone());
                    self.emit(ConnectionStatus::Connected, name);
                }
                BackendEvent::Down => {
                    // The backend dropped the tunnel underneath us (for
                    // example an external `wg-quick down`).
                    if let Some(mut active) = self.active.take() {
                        active.interface.release();
                    }
                    self.emit(ConnectionStatus::Disconnected, None);
                }
                BackendEvent::ToggleError => {
                    let name = self.active.take().map(|mut active| {
                        active.interface.release();
                        active.profile_name
                    });
                    self.emit(ConnectionStatus::Error, name);
                }
            }
        }
    }

    /// Discards queued backend events already accounted for.
    fn drain_events(&mut self) {
        while self.events_rx.try_recv().is_ok() {}
    }

    fn emit(&self, status: ConnectionStatus, profile: Option<String>) {
        self.emit_with_detail(status, profile, None);
    }

    fn emit_with_detail(
        &self,
        status: ConnectionStatus,
        profile: Option<String>,
        detail: Option<String>,
    ) {
        let _ = self.status.send(StatusUpdate {
            status,
            profile,
            detail,
        });
    }
}
