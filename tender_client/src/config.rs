//! Endpoint configuration for reaching the tender management backend.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "127.0.0.1:4943";

pub const HOST_ENV: &str = "TENDER_AGENT_HOST";
pub const INTERFACE_ENV: &str = "TENDER_AGENT_INTERFACE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// `host:port` of the backend.
    pub host: String,
    /// Interface description artifact; the built-in description is used when unset.
    pub interface: Option<PathBuf>,
}

impl Default for EndpointConfig {
    fn default() -> EndpointConfig {
        EndpointConfig {
            host: DEFAULT_HOST.to_string(),
            interface: None,
        }
    }
}

impl EndpointConfig {
    pub fn from_toml(toml: &str) -> Result<EndpointConfig, Error> {
        toml::from_str(toml).map_err(Error::InvalidConfig)
    }

    pub fn load(path: &Path) -> Result<EndpointConfig, Error> {
        let toml = std::fs::read_to_string(path).map_err(|source| Error::CannotReadFile {
            path: path.display().to_string(),
            source,
        })?;
        EndpointConfig::from_toml(&toml)
    }

    /// Defaults overridden by `TENDER_AGENT_HOST` and `TENDER_AGENT_INTERFACE`.
    pub fn from_env() -> EndpointConfig {
        EndpointConfig::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> EndpointConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(interface) = lookup(INTERFACE_ENV) {
            self.interface = Some(PathBuf::from(interface));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_local_replica() {
        let config = EndpointConfig::default();
        assert_eq!(config.host, "127.0.0.1:4943");
        assert_eq!(config.interface, None);
    }

    #[test]
    fn partial_toml_keeps_defaults() -> Result<(), Error> {
        let config = EndpointConfig::from_toml(r#"interface = "declarations/tender_management.json""#)?;
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(
            config.interface,
            Some(PathBuf::from("declarations/tender_management.json"))
        );
        Ok(())
    }

    #[test]
    fn overrides_replace_file_values() -> Result<(), Error> {
        let config = EndpointConfig::from_toml(r#"host = "10.0.0.5:8000""#)?.with_overrides(|key| {
            (key == HOST_ENV).then(|| "backend.internal:4943".to_string())
        });
        assert_eq!(config.host, "backend.internal:4943");
        assert_eq!(config.interface, None);
        Ok(())
    }

    #[test]
    fn loads_from_file() -> Result<(), Error> {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, r#"host = "127.0.0.1:9000""#).expect("write config");

        let config = EndpointConfig::load(file.path())?;
        assert_eq!(config.host, "127.0.0.1:9000");
        Ok(())
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(matches!(
            EndpointConfig::from_toml("host = 4943"),
            Err(Error::InvalidConfig(_))
        ));
    }
}
