//! VPN profile record.

use serde::{Deserialize, Serialize};

/// An immutable WireGuard server profile.
///
/// A profile bundles the keys, addresses, and routing rules describing one
/// connectable remote peer. All fields are kept in their at-rest string form
/// (keys base64, addresses CIDR, endpoint `host:port`); parsing and
/// validation happen at connect time inside the tunnel service, so an
/// invalid profile loads fine and surfaces a connection error instead of a
/// load-time rejection.
///
/// The struct is a plain serializable record with stable field order, which
/// is also what lets it cross the channel into the service worker by value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnProfile {
    /// Opaque unique identifier, unique across the loaded collection.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Client private key, base64-encoded.
    pub private_key: String,
    /// Client public key, base64-encoded.
    pub public_key: String,
    /// CIDR address(es) assigned to the tunnel interface; may be a
    /// comma-separated list.
    pub address: String,
    /// Ordered DNS resolvers to use inside the tunnel.
    #[serde(default)]
    pub dns_servers: Vec<String>,
    /// Remote peer's public key, base64-encoded.
    pub peer_public_key: String,
    /// Optional additional symmetric secret, base64-encoded.
    #[serde(default)]
    pub preshared_key: Option<String>,
    /// CIDR ranges routed through the tunnel.
    #[serde(default)]
    pub allowed_ips: Vec<String>,
    /// Remote `host:port` of the peer.
    pub endpoint: String,
    /// Keepalive interval in seconds; `None` or 0 disables keepalive.
    #[serde(default)]
    pub keepalive: Option<u16>,
}

impl VpnProfile {
    /// Keepalive normalized so that a configured 0 means disabled.
    #[must_use]
    pub fn effective_keepalive(&self) -> Option<u16> {
        match self.keepalive {
            Some(0) | None => None,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VpnProfile {
        VpnProfile {
            id: "sg-01".into(),
            name: "Singapore".into(),
            private_key: "gWPWTykVmGJCBezUeNUvGjPJWmA7bNxMJg3VI8s4P4g=".into(),
            public_key: "+de4gK3z6ktMv2GvEU6jUUV6EPMIbaVVm1K2rEaue7s=".into(),
            address: "10.7.0.2/24".into(),
            dns_servers: vec!["94.140.14.14".into()],
            peer_public_key: "BNtbvgWlDSBOQrM56XGV9xokAO3ETg6RM1nYvL7ZjCA=".into(),
            preshared_key: None,
            allowed_ips: vec!["0.0.0.0/0".into()],
            endpoint: "203.0.113.7:51820".into(),
            keepalive: Some(25),
        }
    }

    #[test]
    fn test_effective_keepalive_zero_disables() {
        let mut profile = sample();
        profile.keepalive = Some(0);
        assert_eq!(profile.effective_keepalive(), None);
    }

    #[test]
    fn test_effective_keepalive_passthrough() {
        assert_eq!(sample().effective_keepalive(), Some(25));
    }

    #[test]
    fn test_toml_roundtrip_with_optional_fields_absent() {
        let toml_src = r#"
id = "cn-01"
name = "China"
private_key = "kvU9D4SA/IEgOFbL2ryUNM1yk4caAadp5COsJwQ/gmU="
public_key = "RsNsHyvRhjkDHENB9SI57DKIpkiSaii0wsW25ky/DpE="
address = "10.7.0.2/24"
peer_public_key = "7RSJFJha4ZV12mF8uZw5pyg/EFJlD45phEzfVqrqG3s="
endpoint = "198.51.100.2:51820"
"#;
        let profile: VpnProfile = toml::from_str(toml_src).unwrap();
        assert_eq!(profile.name, "China");
        assert!(profile.dns_servers.is_empty());
        assert!(profile.preshared_key.is_none());
        assert_eq!(profile.effective_keepalive(), None);
    }
}
