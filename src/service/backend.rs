//! Tunnel backend contract and the `wg-quick` implementation.
//!
//! The backend owns the actual WireGuard machinery. tundeck only renders a
//! configuration, hands it over together with the platform interface handle,
//! and listens for state-change events (`Up`, `Down`, `ToggleError`) on a
//! channel registered at creation time.

use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::sync::mpsc::Sender;

use crate::service::config::TunnelConfig;
use crate::service::platform::TunnelInterface;

/// State-change notifications delivered by a backend tunnel.
///
/// Exactly one terminal-or-steady event is delivered per transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendEvent {
    /// The tunnel came up and is passing traffic.
    Up,
    /// The tunnel went down cleanly.
    Down,
    /// The tunnel failed to toggle into the requested state.
    ToggleError,
}

/// Backend-side failures.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{command} exited with {status}: {detail}")]
    CommandFailed {
        command: &'static str,
        status: String,
        detail: String,
    },

    #[error("interface handle has no config file")]
    MissingConfigFile,
}

/// A live backend tunnel created from one interface + configuration pair.
pub trait TunnelHandle: Send {
    /// Brings the tunnel up. Emits `Up` or `ToggleError` on the event channel.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also reported as `ToggleError`.
    fn start(&mut self) -> Result<(), BackendError>;

    /// Tears the tunnel down. Emits `Down` on a clean teardown.
    ///
    /// # Errors
    ///
    /// Returns the teardown failure; callers are expected to continue
    /// releasing local resources regardless.
    fn stop(&mut self) -> Result<(), BackendError>;

    /// True while the tunnel is up.
    fn is_up(&self) -> bool;
}

/// Creates backend tunnels.
pub trait TunnelBackend: Send {
    /// Binds a configuration to an established interface and registers the
    /// event channel for later state changes.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration cannot be handed to the
    /// backend; no tunnel exists afterwards.
    fn create(
        &mut self,
        interface: &dyn TunnelInterface,
        config: &TunnelConfig,
        events: Sender<BackendEvent>,
    ) -> Result<Box<dyn TunnelHandle>, BackendError>;
}

/// Renders a complete `wg-quick` configuration file.
#[must_use]
pub fn render_config(config: &TunnelConfig, mtu: u16) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "[Interface]");
    let _ = writeln!(out, "PrivateKey = {}", config.private_key.to_base64());
    let addresses: Vec<String> = config.addresses.iter().map(ToString::to_string).collect();
    let _ = writeln!(out, "Address = {}", addresses.join(", "));
    if !config.dns.is_empty() {
        let dns: Vec<String> = config.dns.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "DNS = {}", dns.join(", "));
    }
    let _ = writeln!(out, "MTU = {mtu}");

    let _ = writeln!(out);
    let _ = writeln!(out, "[Peer]");
    let _ = writeln!(out, "PublicKey = {}", config.peer_public_key.to_base64());
    if let Some(psk) = &config.preshared_key {
        let _ = writeln!(out, "PresharedKey = {}", psk.to_base64());
    }
    if !config.allowed_ips.is_empty() {
        let routes: Vec<String> = config.allowed_ips.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "AllowedIPs = {}", routes.join(", "));
    }
    let _ = writeln!(out, "Endpoint = {}", config.endpoint);
    if let Some(keepalive) = config.keepalive {
        let _ = writeln!(out, "PersistentKeepalive = {keepalive}");
    }

    out
}

/// Backend driving the pre-built system `wg-quick` tooling.
///
/// All handshake, key exchange, and packet work happens inside WireGuard
/// itself; this type only shells out and reports the outcome.
pub struct WgQuickBackend;

impl TunnelBackend for WgQuickBackend {
    fn create(
        &mut self,
        interface: &dyn TunnelInterface,
        config: &TunnelConfig,
        events: Sender<BackendEvent>,
    ) -> Result<Box<dyn TunnelHandle>, BackendError> {
        let path = interface
            .config_path()
            .ok_or(BackendError::MissingConfigFile)?
            .to_path_buf();

        let rendered = render_config(config, crate::constants::TUNNEL_MTU);
        std::fs::write(&path, rendered)?;

        Ok(Box::new(WgQuickTunnel {
            config_path: path,
            events,
            up: false,
        }))
    }
}

/// One `wg-quick`-managed tunnel.
struct WgQuickTunnel {
    config_path: PathBuf,
    events: Sender<BackendEvent>,
    up: bool,
}

impl WgQuickTunnel {
    fn run(&self, direction: &'static str) -> Result<(), BackendError> {
        let output = Command::new("wg-quick")
            .arg(direction)
            .arg(&self.config_path)
            .output()?;

        if output.status.success() {
            Ok(())
        } else {
            Err(BackendError::CommandFailed {
                command: "wg-quick",
                status: output.status.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl TunnelHandle for WgQuickTunnel {
    fn start(&mut self) -> Result<(), BackendError> {
        match self.run("up") {
            Ok(()) => {
                self.up = true;
                let _ = self.events.send(BackendEvent::Up);
                Ok(())
            }
            Err(err) => {
                let _ = self.events.send(BackendEvent::ToggleError);
                Err(err)
            }
        }
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.up = false;
        match self.run("down") {
            Ok(()) => {
                let _ = self.events.send(BackendEvent::Down);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn is_up(&self) -> bool {
        self.up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;

    fn config_for(index: usize) -> TunnelConfig {
        TunnelConfig::from_profile(&store::builtin_profiles()[index]).unwrap()
    }

    #[test]
    fn test_render_full_config() {
        let rendered = render_config(&config_for(1), 1420);

        assert!(rendered.starts_with("[Interface]\n"));
        assert!(rendered.contains("PrivateKey = gWPWTykVmGJCBezUeNUvGjPJWmA7bNxMJg3VI8s4P4g="));
        assert!(rendered.contains("Address = 10.8.0.2/24"));
        assert!(rendered.contains("DNS = 1.1.1.1, 9.9.9.9"));
        assert!(rendered.contains("MTU = 1420"));
        assert!(rendered.contains("[Peer]"));
        assert!(rendered.contains("PresharedKey = U+mhBngSM6Nul6/j0Eu9fJeknch6a+ZnEos65zRG8n0="));
        assert!(rendered.contains("AllowedIPs = 0.0.0.0/0"));
        assert!(rendered.contains("Endpoint = 203.0.113.7:51820"));
        assert!(rendered.contains("PersistentKeepalive = 25"));
    }

    #[test]
    fn test_render_omits_absent_optionals() {
        let mut config = config_for(0);
        config.preshared_key = None;
        config.keepalive = None;
        config.dns.clear();

        let rendered = render_config(&config, 1420);
        assert!(!rendered.contains("PresharedKey"));
        assert!(!rendered.contains("PersistentKeepalive"));
        assert!(!rendered.contains("DNS"));
    }

    #[test]
    fn test_render_joins_multiple_routes() {
        let rendered = render_config(&config_for(0), 1420);
        assert!(rendered.contains("AllowedIPs = 0.0.0.0/0, ::/0"));
    }
}
