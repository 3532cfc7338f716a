//! Parsed tunnel configuration.
//!
//! Converts the string-typed [`VpnProfile`] record into the structured shape
//! the backend consumes: decoded Curve25519 keys, a resolved endpoint, CIDR
//! blocks for interface addresses and allowed routes, and DNS resolvers.
//! A parse failure on any field fails the whole conversion; no partially
//! parsed configuration ever reaches the backend.

use std::fmt;
use std::net::IpAddr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::state::VpnProfile;

/// Field-level parse errors raised while building a [`TunnelConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} is empty")]
    EmptyField { field: &'static str },

    #[error("{field} is not valid base64")]
    InvalidBase64 { field: &'static str },

    #[error("{field} is not a 32-byte key")]
    InvalidKeyLength { field: &'static str },

    #[error("invalid endpoint '{value}' (expected host:port)")]
    InvalidEndpoint { value: String },

    #[error("invalid CIDR '{value}'")]
    InvalidCidr { value: String },

    #[error("invalid DNS address '{value}'")]
    InvalidDns { value: String },
}

/// A WireGuard key: 32 bytes, base64 at rest.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    bytes: [u8; 32],
}

impl Key {
    /// Decodes a base64-encoded 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming `field` when the value is empty, not
    /// base64, or not exactly 32 bytes.
    pub fn from_base64(value: &str, field: &'static str) -> Result<Self, ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyField { field });
        }
        let decoded = BASE64
            .decode(value.trim())
            .map_err(|_| ConfigError::InvalidBase64 { field })?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| ConfigError::InvalidKeyLength { field })?;
        Ok(Self { bytes })
    }

    /// Re-encodes the key for rendering into a backend config.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak key material through Debug output
        write!(f, "Key([redacted])")
    }
}

/// Remote peer endpoint as `host:port`.
///
/// The host part is kept as a string; it may be a DNS name that the backend
/// resolves itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Parses `host:port`, accepting bracketed IPv6 literals.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] when the value has no port
    /// separator, an empty host, or an unparsable port.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidEndpoint {
            value: value.to_string(),
        };

        let (host, port) = value.rsplit_once(':').ok_or_else(invalid)?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(invalid());
        }
        let port: u16 = port.parse().map_err(|_| invalid())?;
        if port == 0 {
            return Err(invalid());
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// An address range in CIDR notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CidrBlock {
    pub addr: IpAddr,
    pub prefix: u8,
}

impl CidrBlock {
    /// Parses `addr/prefix`; a bare address gets its full-length prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCidr`] for an unparsable address or an
    /// out-of-range prefix.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidCidr {
            value: value.to_string(),
        };

        let (addr_part, prefix_part) = match value.split_once('/') {
            Some((a, p)) => (a, Some(p)),
            None => (value, None),
        };
        let addr: IpAddr = addr_part.trim().parse().map_err(|_| invalid())?;
        let max_prefix = if addr.is_ipv4() { 32 } else { 128 };
        let prefix = match prefix_part {
            Some(p) => p.trim().parse::<u8>().map_err(|_| invalid())?,
            None => max_prefix,
        };
        if prefix > max_prefix {
            return Err(invalid());
        }
        Ok(Self { addr, prefix })
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

/// Complete parsed configuration handed to the backend.
#[derive(Clone, Debug)]
pub struct TunnelConfig {
    /// Client private key.
    pub private_key: Key,
    /// Interface addresses (from the possibly comma-separated profile field).
    pub addresses: Vec<CidrBlock>,
    /// DNS resolvers inside the tunnel.
    pub dns: Vec<IpAddr>,
    /// Remote peer public key.
    pub peer_public_key: Key,
    /// Optional preshared key.
    pub preshared_key: Option<Key>,
    /// Routes sent through the tunnel.
    pub allowed_ips: Vec<CidrBlock>,
    /// Remote peer endpoint.
    pub endpoint: Endpoint,
    /// Persistent keepalive in seconds, if enabled.
    pub keepalive: Option<u16>,
}

impl TunnelConfig {
    /// Parses and validates every field of a profile.
    ///
    /// # Errors
    ///
    /// Returns the first field-level [`ConfigError`] encountered; the caller
    /// treats any error as `InvalidConfiguration` for the whole attempt.
    pub fn from_profile(profile: &VpnProfile) -> Result<Self, ConfigError> {
        let private_key = Key::from_base64(&profile.private_key, "private_key")?;
        // The client public key is not rendered, but a broken value still
        // marks the profile unconnectable.
        Key::from_base64(&profile.public_key, "public_key")?;
        let peer_public_key = Key::from_base64(&profile.peer_public_key, "peer_public_key")?;
        let preshared_key = match profile.preshared_key.as_deref() {
            Some(psk) if !psk.trim().is_empty() => {
                Some(Key::from_base64(psk, "preshared_key")?)
            }
            _ => None,
        };

        if profile.address.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "address" });
        }
        let addresses = profile
            .address
            .split(',')
            .map(CidrBlock::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let dns = profile
            .dns_servers
            .iter()
            .map(|s| {
                s.trim().parse::<IpAddr>().map_err(|_| ConfigError::InvalidDns {
                    value: s.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let allowed_ips = profile
            .allowed_ips
            .iter()
            .map(|s| CidrBlock::parse(s))
            .collect::<Result<Vec<_>, _>>()?;

        let endpoint = Endpoint::parse(&profile.endpoint)?;

        Ok(Self {
            private_key,
            addresses,
            dns,
            peer_public_key,
            preshared_key,
            allowed_ips,
            endpoint,
            keepalive: profile.effective_keepalive(),
        })
    }
}
