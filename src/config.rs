//! Configuration types for insta-dl

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// Download storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory the fetcher writes into and `/video/...` serves from
    /// (default: "static/downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
        }
    }
}

/// External fetcher configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Path to the fetcher executable (auto-detected if None)
    #[serde(default)]
    pub binary_path: Option<PathBuf>,

    /// Whether to search PATH for the fetcher if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Upper bound on a single fetch (None = wait indefinitely)
    #[serde(default, with = "optional_duration_serde")]
    pub timeout: Option<Duration>,

    /// Extra arguments passed to the fetcher before the URL
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            search_path: true,
            timeout: None,
            extra_args: vec![],
        }
    }
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// sqlx connection string (default: "sqlite:instagram_downloader.db")
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

/// HTTP API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Logging configuration used by the server binary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit newline-delimited JSON instead of human-readable lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Main configuration for insta-dl
///
/// Every field has a default, so `Config::default()` runs a working local
/// instance. [`Config::from_env`] overlays environment variables.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download storage
    #[serde(default)]
    pub download: DownloadConfig,

    /// External fetcher
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Database location
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// HTTP API
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.download.download_dir
    }

    /// Build a configuration from environment variables, falling back to defaults.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `DATABASE_URL` | `persistence.database_url` |
    /// | `INSTA_DL_BIND` | `api.bind_address` |
    /// | `INSTA_DL_DOWNLOAD_DIR` | `download.download_dir` |
    /// | `INSTA_DL_FETCHER` | `fetcher.binary_path` |
    /// | `INSTA_DL_FETCH_TIMEOUT_SECS` | `fetcher.timeout` (0 disables) |
    /// | `INSTA_DL_CORS` | `api.cors_enabled` |
    /// | `INSTA_DL_SWAGGER` | `api.swagger_ui` |
    /// | `INSTA_DL_LOG` | `log.filter` |
    /// | `INSTA_DL_LOG_JSON` | `log.json` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.persistence.database_url = url;
        }
        if let Some(addr) = lookup("INSTA_DL_BIND") {
            config.api.bind_address = parse_value("INSTA_DL_BIND", &addr)?;
        }
        if let Some(dir) = lookup("INSTA_DL_DOWNLOAD_DIR") {
            config.download.download_dir = PathBuf::from(dir);
        }
        if let Some(bin) = lookup("INSTA_DL_FETCHER") {
            config.fetcher.binary_path = Some(PathBuf::from(bin));
        }
        if let Some(secs) = lookup("INSTA_DL_FETCH_TIMEOUT_SECS") {
            let secs: u64 = parse_value("INSTA_DL_FETCH_TIMEOUT_SECS", &secs)?;
            config.fetcher.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(flag) = lookup("INSTA_DL_CORS") {
            config.api.cors_enabled = parse_flag("INSTA_DL_CORS", &flag)?;
        }
        if let Some(flag) = lookup("INSTA_DL_SWAGGER") {
            config.api.swagger_ui = parse_flag("INSTA_DL_SWAGGER", &flag)?;
        }
        if let Some(filter) = lookup("INSTA_DL_LOG") {
            config.log.filter = filter;
        }
        if let Some(flag) = lookup("INSTA_DL_LOG_JSON") {
            config.log.json = parse_flag("INSTA_DL_LOG_JSON", &flag)?;
        }

        Ok(config)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| Error::Config {
        message: format!("invalid value {raw:?}: {e}"),
        key: Some(key.to_string()),
    })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config {
            message: format!("invalid boolean {raw:?}"),
            key: Some(key.to_string()),
        }),
    }
}

// Default value functions
fn default_download_dir() -> PathBuf {
    PathBuf::from("static").join("downloads")
}

fn default_database_url() -> String {
    "sqlite:instagram_downloader.db".to_string()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
