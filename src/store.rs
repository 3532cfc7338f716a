//! Profile configuration store.
//!
//! Produces the initial ordered list of [`VpnProfile`] records. Profiles come
//! from `~/.config/tundeck/profiles.toml` when present; otherwise a built-in
//! pair of sample servers is used so the dashboard is never empty on first
//! launch. Loading never fails: a malformed file falls back to the built-ins
//! and duplicate ids are dropped (first occurrence wins).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants;
use crate::state::VpnProfile;

/// On-disk shape of `profiles.toml`.
#[derive(Debug, Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    profiles: Vec<VpnProfile>,
}

/// Loads the ordered profile collection.
///
/// Deterministic and side-effect free; the returned list never contains two
/// profiles with the same `id`.
#[must_use]
pub fn load_profiles() -> Vec<VpnProfile> {
    let from_file = crate::utils::config_dir()
        .map(|dir| dir.join(constants::PROFILES_FILE_NAME))
        .and_then(|path| load_profiles_file(&path));

    let profiles = from_file.unwrap_or_else(builtin_profiles);
    dedup_by_id(profiles)
}

/// Parses a profile file, returning `None` when it is absent or malformed.
fn load_profiles_file(path: &Path) -> Option<Vec<VpnProfile>> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str::<ProfilesFile>(&content) {
        Ok(file) => Some(file.profiles),
        Err(_) => None,
    }
}

/// Built-in sample servers used when no profile file exists.
#[must_use]
pub fn builtin_profiles() -> Vec<VpnProfile> {
    vec![
        VpnProfile {
            id: "cn-01".into(),
            name: "China".into(),
            private_key: "kvU9D4SA/IEgOFbL2ryUNM1yk4caAadp5COsJwQ/gmU=".into(),
            public_key: "RsNsHyvRhjkDHENB9SI57DKIpkiSaii0wsW25ky/DpE=".into(),
            address: "10.7.0.2/24".into(),
            dns_servers: vec!["94.140.14.14".into(), "94.140.15.15".into()],
            peer_public_key: "7RSJFJha4ZV12mF8uZw5pyg/EFJlD45phEzfVqrqG3s=".into(),
            preshared_key: None,
            allowed_ips: vec!["0.0.0.0/0".into(), "::/0".into()],
            endpoint: "198.51.100.2:51820".into(),
            keepalive: Some(25),
        },
        VpnProfile {
            id: "sg-01".into(),
            name: "Singapore".into(),
            private_key: "gWPWTykVmGJCBezUeNUvGjPJWmA7bNxMJg3VI8s4P4g=".into(),
            public_key: "+de4gK3z6ktMv2GvEU6jUUV6EPMIbaVVm1K2rEaue7s=".into(),
            address: "10.8.0.2/24".into(),
            dns_servers: vec!["1.1.1.1".into(), "9.9.9.9".into()],
            peer_public_key: "BNtbvgWlDSBOQrM56XGV9xokAO3ETg6RM1nYvL7ZjCA=".into(),
            preshared_key: Some("U+mhBngSM6Nul6/j0Eu9fJeknch6a+ZnEos65zRG8n0=".into()),
            allowed_ips: vec!["0.0.0.0/0".into()],
            endpoint: "203.0.113.7:51820".into(),
            keepalive: Some(25),
        },
    ]
}

/// Removes profiles whose `id` was already seen, preserving order.
fn dedup_by_id(profiles: Vec<VpnProfile>) -> Vec<VpnProfile> {
    let mut seen = Vec::new();
    let mut out = Vec::with_capacity(profiles.len());
    for profile in profiles {
        if seen.contains(&profile.id) {
            continue;
        }
        seen.push(profile.id.clone());
        out.push(profile);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_ordered_and_unique() {
        let profiles = builtin_profiles();
        assert_eq!(profiles[0].name, "China");
        assert_eq!(profiles[1].name, "Singapore");

        let deduped = dedup_by_id(profiles.clone());
        assert_eq!(deduped.len(), profiles.len());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut profiles = builtin_profiles();
        let mut dup = profiles[0].clone();
        dup.name = "China (copy)".into();
        profiles.push(dup);

        let deduped = dedup_by_id(profiles);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "China");
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let dir = std::env::temp_dir();
        let path = dir.join("tundeck-test-profiles-broken.toml");
        std::fs::write(&path, "profiles = [ this is not toml ]").unwrap();

        assert!(load_profiles_file(&path).is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_profiles_file_parses() {
        let dir = std::env::temp_dir();
        let path = dir.join("tundeck-test-profiles-ok.toml");
        std::fs::write(
            &path,
            r#"
[[profiles]]
id = "nl-01"
name = "Amsterdam"
private_key = "kvU9D4SA/IEgOFbL2ryUNM1yk4caAadp5COsJwQ/gmU="
public_key = "RsNsHyvRhjkDHENB9SI57DKIpkiSaii0wsW25ky/DpE="
address = "10.9.0.2/24"
peer_public_key = "7RSJFJha4ZV12mF8uZw5pyg/EFJlD45phEzfVqrqG3s="
endpoint = "192.0.2.10:51820"
"#,
        )
        .unwrap();

        let profiles = load_profiles_file(&path).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "Amsterdam");

        let _ = std::fs::remove_file(&path);
    }
}
