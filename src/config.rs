//! Server settings, loaded once at startup and passed by reference afterwards

use crate::error::ConfigError;
use crate::index::FreshnessPolicy;
use crate::utils::{expand_home, get_default_config_path};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default TCP port
pub const DEFAULT_PORT: u16 = 44445;

/// Everything the server needs to start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Corpus file; a leading `~` is expanded
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,

    /// Re-read the corpus on every query instead of caching it
    #[serde(default)]
    pub reread_on_query: bool,

    #[serde(default)]
    pub tls_enabled: bool,

    #[serde(default = "default_cert_path")]
    pub cert_path: PathBuf,

    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,

    /// Socket read/write timeout per connection; 0 disables it
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cert_path() -> PathBuf {
    PathBuf::from("cert.pem")
}

fn default_key_path() -> PathBuf {
    PathBuf::from("key.pem")
}

fn default_io_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            corpus_path: None,
            reread_on_query: false,
            tls_enabled: false,
            cert_path: default_cert_path(),
            key_path: default_key_path(),
            io_timeout_secs: default_io_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from `path`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, else the per-user default file if present,
    /// else built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match get_default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Check that the settings can start a server
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }

        if self.corpus_path.is_none() {
            return Err(ConfigError::Invalid("corpus_path is not set".to_string()));
        }

        if self.tls_enabled {
            if !cfg!(feature = "tls") {
                return Err(ConfigError::Invalid(
                    "TLS enabled but exactline was built without the `tls` feature".to_string(),
                ));
            }
            for path in [&self.cert_path, &self.key_path] {
                if !path.exists() {
                    return Err(ConfigError::MissingTlsMaterial(path.clone()));
                }
            }
        }

        Ok(())
    }

    /// Corpus path with `~` expanded
    pub fn resolved_corpus_path(&self) -> Option<PathBuf> {
        self.corpus_path.as_deref().map(expand_home)
    }

    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::from_reread_flag(self.reread_on_query)
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        match self.io_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 44445);
        assert!(!settings.reread_on_query);
        assert!(!settings.tls_enabled);
        assert_eq!(settings.io_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.freshness_policy(), FreshnessPolicy::Cached);
    }

    #[test]
    fn test_settings_partial_json() {
        let json = r#"{"corpus_path": "/srv/200k.txt", "reread_on_query": true, "io_timeout_secs": 0}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.port, 44445);
        assert_eq!(settings.corpus_path, Some(PathBuf::from("/srv/200k.txt")));
        assert_eq!(settings.freshness_policy(), FreshnessPolicy::Reread);
        assert_eq!(settings.io_timeout(), None);
    }

    #[test]
    fn test_settings_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.json");
        assert!(matches!(
            Settings::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        bad.write_all(b"{ port: nope").unwrap();
        assert!(matches!(
            Settings::from_file(bad.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"host": "127.0.0.1", "port": 9000}"#).unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_validate_requires_corpus() {
        let settings = Settings::default();
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_missing_tls_material() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            corpus_path: Some(PathBuf::from("corpus.txt")),
            tls_enabled: true,
            cert_path: dir.path().join("cert.pem"),
            key_path: dir.path().join("key.pem"),
            ..Settings::default()
        };

        let err = settings.validate().unwrap_err();
        if cfg!(feature = "tls") {
            assert!(matches!(err, ConfigError::MissingTlsMaterial(p) if p.ends_with("cert.pem")));
        } else {
            assert!(matches!(err, ConfigError::Invalid(_)));
        }
    }

    #[test]
    fn test_validate_plain_ok() {
        let settings = Settings {
            corpus_path: Some(PathBuf::from("corpus.txt")),
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }
}
