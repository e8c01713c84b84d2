// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Well-known names and server configuration.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: standard interface, method and error names
//! - **Level 2 (Dynamic)**: [`ServerConfig`], built in code or loaded from YAML
//!   (feature `config-loaders`)
//!
//! # Example YAML
//!
//! ```yaml
//! introspection: true
//! peer: true
//! machine_id_paths:
//!   - /etc/machine-id
//!   - /var/lib/dbus/machine-id
//! ```

use std::path::PathBuf;

// =======================================================================
// Standard interfaces
// =======================================================================

/// Interface answering self-description queries
pub const INTROSPECTABLE_INTERFACE: &str = "org.freedesktop.DBus.Introspectable";

/// Method name of the self-description query
pub const INTROSPECT_METHOD: &str = "Introspect";

/// Interface every peer answers regardless of exports
pub const PEER_INTERFACE: &str = "org.freedesktop.DBus.Peer";

pub const PING_METHOD: &str = "Ping";

pub const GET_MACHINE_ID_METHOD: &str = "GetMachineId";

// =======================================================================
// Error names
// =======================================================================

pub const ERR_UNKNOWN_OBJECT: &str = "org.freedesktop.DBus.Error.UnknownObject";
pub const ERR_UNKNOWN_INTERFACE: &str = "org.freedesktop.DBus.Error.UnknownInterface";
pub const ERR_UNKNOWN_METHOD: &str = "org.freedesktop.DBus.Error.UnknownMethod";
pub const ERR_INVALID_ARGS: &str = "org.freedesktop.DBus.Error.InvalidArgs";
pub const ERR_INVALID_METHOD: &str = "org.freedesktop.DBus.Error.InvalidMethod";
pub const ERR_FAILED: &str = "org.freedesktop.DBus.Error.Failed";

// =======================================================================
// Limits
// =======================================================================

/// Maximum length of interface and member names, in bytes
pub const MAX_NAME_LEN: usize = 255;

/// Default locations searched for the machine id
pub const DEFAULT_MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// Runtime configuration for an [`ObjectServer`](crate::server::ObjectServer).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(default, deny_unknown_fields))]
pub struct ServerConfig {
    /// Answer `Introspect` calls at every path
    pub introspection: bool,
    /// Answer `org.freedesktop.DBus.Peer` calls at every path
    pub peer: bool,
    /// Files searched, in order, for `GetMachineId`
    pub machine_id_paths: Vec<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            introspection: true,
            peer: true,
            machine_id_paths: DEFAULT_MACHINE_ID_PATHS
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn introspection(mut self, enabled: bool) -> Self {
        self.introspection = enabled;
        self
    }

    pub fn peer(mut self, enabled: bool) -> Self {
        self.peer = enabled;
        self
    }

    /// Replace the machine-id search list.
    pub fn machine_id_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.machine_id_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a YAML document; missing keys keep their defaults.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| crate::Error::Config(format!("Failed to parse YAML: {}", e)))
    }

    /// Load a YAML configuration file.
    #[cfg(feature = "config-loaders")]
    pub fn load_yaml(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_standard_interfaces() {
        let config = ServerConfig::default();
        assert!(config.introspection);
        assert!(config.peer);
        assert_eq!(config.machine_id_paths.len(), DEFAULT_MACHINE_ID_PATHS.len());
    }

    #[test]
    fn builder_overrides() {
        let config = ServerConfig::new()
            .peer(false)
            .machine_id_paths(["/tmp/id"]);
        assert!(!config.peer);
        assert_eq!(config.machine_id_paths, vec![PathBuf::from("/tmp/id")]);
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn yaml_partial_document() {
        let config = ServerConfig::from_yaml_str("peer: false\n").expect("parse");
        assert!(!config.peer);
        assert!(config.introspection);
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn yaml_rejects_unknown_keys() {
        let err = ServerConfig::from_yaml_str("bogus: 1\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        // Handler panics are always isolated; there is no switch for it.
        let err = ServerConfig::from_yaml_str("catch_panics: false\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn yaml_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "introspection: false\nmachine_id_paths: [/nonexistent]").expect("write");
        let config = ServerConfig::load_yaml(file.path()).expect("load");
        assert!(!config.introspection);
        assert_eq!(config.machine_id_paths, vec![PathBuf::from("/nonexistent")]);
    }
}
