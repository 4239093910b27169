use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const ENV_HOST: &str = "OPENMETADATA_HOST";
pub const ENV_JWT_TOKEN: &str = "OPENMETADATA_JWT_TOKEN";
pub const ENV_USERNAME: &str = "OPENMETADATA_USERNAME";
pub const ENV_PASSWORD: &str = "OPENMETADATA_PASSWORD";

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENMETADATA_HOST is not set")]
    MissingHost,
    #[error("either OPENMETADATA_JWT_TOKEN or OPENMETADATA_USERNAME and OPENMETADATA_PASSWORD must be set")]
    MissingCredentials,
    #[error("invalid metadata host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How requests to the metadata service authenticate.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    Bearer(String),
    /// Accepted for configuration compatibility; requests are sent without
    /// credentials in this mode.
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Bearer(_) => f.write_str("Bearer(***)"),
            Auth::Basic { username, .. } => write!(f, "Basic({username}, ***)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMetadataConfig {
    pub host: String,
    pub auth: Auth,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl OpenMetadataConfig {
    pub fn new(host: impl Into<String>, auth: Auth) -> Self {
        Self {
            host: host.into(),
            auth,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub openmetadata: OpenMetadataConfig,
}

/// On-disk layout of the optional TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub openmetadata: OpenMetadataSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenMetadataSection {
    pub host: Option<String>,
    pub jwt_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

impl FileConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}

impl AppConfig {
    /// Load the optional file, then let process environment override it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => FileConfig::load(p)?,
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Merge file values with a variable lookup; non-empty variables win.
    pub fn from_sources(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let section = file.openmetadata;

        let host = env(ENV_HOST)
            .or(section.host)
            .filter(|h| !h.trim().is_empty())
            .ok_or(ConfigError::MissingHost)?;
        validate_host(&host)?;

        let token = env(ENV_JWT_TOKEN).or(section.jwt_token);
        let username = env(ENV_USERNAME).or(section.username);
        let password = env(ENV_PASSWORD).or(section.password);
        let auth = match (token, username, password) {
            (Some(token), _, _) => Auth::Bearer(token),
            (None, Some(username), Some(password)) => Auth::Basic { username, password },
            _ => return Err(ConfigError::MissingCredentials),
        };

        let mut om = OpenMetadataConfig::new(host, auth);
        if let Some(ms) = section.connect_timeout_ms {
            om.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = section.request_timeout_ms {
            om.request_timeout = Duration::from_millis(ms);
        }
        Ok(Self { openmetadata: om })
    }
}

fn validate_host(host: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidHost {
        host: host.to_string(),
        reason,
    };
    let url = reqwest::Url::parse(host).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_host_is_fatal() {
        let err = AppConfig::from_sources(FileConfig::default(), lookup(&[(ENV_JWT_TOKEN, "t")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingHost));
    }

    #[test]
    fn missing_credentials_is_fatal() {
        let err = AppConfig::from_sources(
            FileConfig::default(),
            lookup(&[(ENV_HOST, "http://om:8585"), (ENV_USERNAME, "admin")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn token_wins_over_basic_credentials() {
        let cfg = AppConfig::from_sources(
            FileConfig::default(),
            lookup(&[
                (ENV_HOST, "http://om:8585"),
                (ENV_JWT_TOKEN, "jwt"),
                (ENV_USERNAME, "admin"),
                (ENV_PASSWORD, "secret"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.openmetadata.auth, Auth::Bearer("jwt".into()));
        assert_eq!(cfg.openmetadata.host, "http://om:8585");
        assert_eq!(cfg.openmetadata.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn basic_credentials_are_accepted() {
        let cfg = AppConfig::from_sources(
            FileConfig::default(),
            lookup(&[
                (ENV_HOST, "https://om.example"),
                (ENV_USERNAME, "admin"),
                (ENV_PASSWORD, "secret"),
            ]),
        )
        .unwrap();
        assert!(matches!(cfg.openmetadata.auth, Auth::Basic { .. }));
        assert!(!format!("{:?}", cfg.openmetadata.auth).contains("secret"));
    }

    #[test]
    fn rejects_non_http_host() {
        let err = AppConfig::from_sources(
            FileConfig::default(),
            lookup(&[(ENV_HOST, "ftp://om"), (ENV_JWT_TOKEN, "t")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
    }

    #[test]
    fn env_overrides_file_values() {
        let file = FileConfig::from_toml_str(
            r#"
            [openmetadata]
            host = "http://from-file:8585"
            jwt_token = "file-token"
            request_timeout_ms = 1500
            "#,
        )
        .unwrap();
        let cfg =
            AppConfig::from_sources(file, lookup(&[(ENV_HOST, "http://from-env:8585")])).unwrap();
        assert_eq!(cfg.openmetadata.host, "http://from-env:8585");
        assert_eq!(cfg.openmetadata.auth, Auth::Bearer("file-token".into()));
        assert_eq!(cfg.openmetadata.request_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let err = FileConfig::from_toml_str("[openmetadata]\nhots = \"typo\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        std::fs::write(
            &path,
            "[openmetadata]\nhost = \"http://om:8585\"\njwt_token = \"t\"\n",
        )
        .unwrap();
        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.openmetadata.host.as_deref(), Some("http://om:8585"));

        let missing = FileConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }

    #[test]
    #[serial]
    fn from_env_reads_process_environment() {
        std::env::set_var(ENV_HOST, "http://localhost:8585");
        std::env::set_var(ENV_JWT_TOKEN, "env-token");
        std::env::remove_var(ENV_USERNAME);
        std::env::remove_var(ENV_PASSWORD);
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.openmetadata.host, "http://localhost:8585");
        assert_eq!(cfg.openmetadata.auth, Auth::Bearer("env-token".into()));
        std::env::remove_var(ENV_HOST);
        std::env::remove_var(ENV_JWT_TOKEN);
    }
}
