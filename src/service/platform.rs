//! Platform interface provisioning.
//!
//! The platform hands the service an exclusive interface handle backed by a
//! rendered runtime config file under `~/.config/tundeck/runtime/`. The
//! handle is the one resource the service must never leak: release is
//! unconditional on every teardown and failure path, with `Drop` as a
//! backstop.

use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::service::config::{CidrBlock, TunnelConfig};

/// Everything the platform needs to provision a tunnel interface.
#[derive(Clone, Debug)]
pub struct InterfaceRequest {
    /// Interface name derived from the profile id.
    pub name: String,
    /// Fixed operational MTU.
    pub mtu: u16,
    /// Local addresses assigned to the interface.
    pub addresses: Vec<CidrBlock>,
    /// DNS resolvers to install while the tunnel is up.
    pub dns: Vec<IpAddr>,
    /// Routes directed through the interface.
    pub routes: Vec<CidrBlock>,
}

impl InterfaceRequest {
    /// Builds a request from a parsed tunnel configuration.
    #[must_use]
    pub fn new(profile_id: &str, config: &TunnelConfig) -> Self {
        Self {
            name: interface_name(profile_id),
            mtu: constants::TUNNEL_MTU,
            addresses: config.addresses.clone(),
            dns: config.dns.clone(),
            routes: config.allowed_ips.clone(),
        }
    }
}

/// Derives a kernel-safe interface name from a profile id.
///
/// Keeps `[a-z0-9-]`, prefixes [`constants::IFACE_PREFIX`], and truncates to
/// the 15-byte interface name limit.
#[must_use]
pub fn interface_name(profile_id: &str) -> String {
    let sanitized: String = profile_id
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    let mut name = format!("{}{sanitized}", constants::IFACE_PREFIX);
    name.truncate(constants::IFACE_NAME_MAX);
    name
}

/// An established tunnel interface handle.
///
/// Exclusively owned by the tunnel service; only the service may pass it to
/// the backend or release it.
pub trait TunnelInterface: Send {
    /// Interface name the backend should bring up.
    fn name(&self) -> &str;
    /// Path of the runtime config file backing this interface, if any.
    fn config_path(&self) -> Option<&Path>;
    /// Releases the interface resources. Idempotent.
    fn release(&mut self);
}

/// Provisions tunnel interfaces.
pub trait Platform: Send {
    /// True when the process already holds the privilege to establish
    /// interfaces; false means user consent must be collected first.
    fn is_permission_granted(&self) -> bool;

    /// Establishes an interface for the given request.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the platform refuses or cannot allocate the
    /// interface resources.
    fn establish(&mut self, request: &InterfaceRequest) -> io::Result<Box<dyn TunnelInterface>>;
}

/// Interface handle backed by a runtime config file on disk.
pub struct RuntimeInterface {
    name: String,
    path: PathBuf,
    released: bool,
}

impl TunnelInterface for RuntimeInterface {
    fn name(&self) -> &str {
        &self.name
    }

    fn config_path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let _ = fs::remove_file(&self.path);
    }
}

impl Drop for RuntimeInterface {
    fn drop(&mut self) {
        self.release();
    }
}

/// Production platform: allocates runtime config files in the config dir.
pub struct SystemPlatform {
    runtime_dir: PathBuf,
}

impl SystemPlatform {
    /// Creates a platform rooted at the default runtime directory.
    ///
    /// # Errors
    ///
    /// Fails when no config directory can be resolved.
    pub fn new() -> io::Result<Self> {
        let base = crate::utils::config_dir()
            .ok_or_else(|| io::Error::other("no config directory available"))?;
        Ok(Self {
            runtime_dir: base.join(constants::RUNTIME_DIR_NAME),
        })
    }

    /// Creates a platform rooted at an explicit directory.
    #[must_use]
    pub fn with_runtime_dir(runtime_dir: PathBuf) -> Self {
        Self { runtime_dir }
    }
}

impl Platform for SystemPlatform {
    fn is_permission_granted(&self) -> bool {
        crate::utils::is_root()
    }

    fn establish(&mut self, request: &InterfaceRequest) -> io::Result<Box<dyn TunnelInterface>> {
        if request.addresses.is_empty() {
            return Err(io::Error::other("interface request has no addresses"));
        }

        fs::create_dir_all(&self.runtime_dir)?;
        let path = self.runtime_dir.join(format!("{}.conf", request.name));
        fs::write(&path, "")?;

        // Key material lands in this file; lock it down like an imported
        // profile (chmod 600).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(Box::new(RuntimeInterface {
            name: request.name.clone(),
            path,
            released: false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::VpnProfile;
    use crate::store;

    fn request_for(profile: &VpnProfile) -> InterfaceRequest {
        let config = TunnelConfig::from_profile(profile).unwrap();
        InterfaceRequest::new(&profile.id, &config)
    }

    #[test]
    fn test_interface_name_sanitized_and_capped() {
        assert_eq!(interface_name("cn-01"), "td-cn-01");
        assert_eq!(interface_name("My Server #1"), "td-myserver1");
        assert!(interface_name("a-very-long-profile-identifier").len() <= 15);
    }

    #[test]
    fn test_request_carries_mtu_and_routes() {
        let profiles = store::builtin_profiles();
        let request = request_for(&profiles[0]);
        assert_eq!(request.mtu, crate::constants::TUNNEL_MTU);
        assert_eq!(request.routes.len(), 2);
        assert_eq!(request.name, "td-cn-01");
    }

    #[test]
    fn test_establish_and_release_runtime_file() {
        let dir = std::env::temp_dir().join("tundeck-test-platform");
        let mut platform = SystemPlatform::with_runtime_dir(dir.clone());

        let profiles = store::builtin_profiles();
        let request = request_for(&profiles[0]);

        let mut interface = platform.establish(&request).unwrap();
        let path = interface.config_path().unwrap().to_path_buf();
        assert!(path.exists());

        interface.release();
        assert!(!path.exists());

        // Idempotent: a second release is a no-op
        interface.release();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_establish_rejects_empty_addresses() {
        let dir = std::env::temp_dir().join("tundeck-test-platform-empty");
        let mut platform = SystemPlatform::with_runtime_dir(dir.clone());

        let profiles = store::builtin_profiles();
        let mut request = request_for(&profiles[0]);
        request.addresses.clear();

        assert!(platform.establish(&request).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
