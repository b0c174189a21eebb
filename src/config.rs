//! Service configuration.
//!
//! Loaded from a TOML file (default `hkweather.toml`). Every section and
//! field has a default, so a missing file or an empty table runs against
//! the live HKO endpoints. Secrets are kept out of the file where possible:
//! the IFTTT key is normally read from `IFTTT_WEB_API_KEY`, which may be
//! set in a `.env` file next to the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::endpoints::{
    DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_RENDER_RETRY, FeedEndpoints, IFTTT_MAKER_BASE_URL,
    NOWCAST_PAGE_URL,
};

pub const DEFAULT_CONFIG_PATH: &str = "hkweather.toml";
pub const API_KEY_ENV: &str = "IFTTT_WEB_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown timezone {0:?}")]
    Timezone(String),
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub feeds: FeedEndpoints,
    pub nowcast: NowcastConfig,
    pub webhook: WebhookConfig,
    pub server: ServerConfig,
    pub report: ReportConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NowcastConfig {
    pub page_url: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Passed through to the renderer; it decides how to use it.
    pub retry: u32,
    pub renderer_program: String,
    pub renderer_script: PathBuf,
}

impl Default for NowcastConfig {
    fn default() -> Self {
        Self {
            page_url: NOWCAST_PAGE_URL.to_string(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            retry: DEFAULT_RENDER_RETRY,
            renderer_program: "node".to_string(),
            renderer_script: PathBuf::from("./scripts/get_rain.js"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub base_url: String,
    /// Fallback key when neither the CLI flag nor the environment has one.
    pub key: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: IFTTT_MAKER_BASE_URL.to_string(),
            key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// IANA zone the report timestamp is shown in.
    pub timezone: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Hong_Kong".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Overall request timeout. Unset means no timeout.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("hkweather_service/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl ServiceConfig {
    /// Reads `path`. A missing file yields the defaults; an unreadable or
    /// invalid one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// The configured report timezone.
    pub fn local_tz(&self) -> Result<Tz, ConfigError> {
        self.report
            .timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Timezone(self.report.timezone.clone()))
    }

    /// Picks the webhook key: explicit flag, then `IFTTT_WEB_API_KEY`, then
    /// the config file. Empty values at any tier are skipped.
    pub fn resolve_api_key(&self, flag: Option<String>) -> Option<String> {
        self.pick_api_key(flag, std::env::var(API_KEY_ENV).ok())
    }

    fn pick_api_key(&self, flag: Option<String>, env: Option<String>) -> Option<String> {
        let non_empty = |k: &String| !k.is_empty();
        flag.filter(non_empty)
            .or_else(|| env.filter(non_empty))
            .or_else(|| self.webhook.key.clone().filter(non_empty))
    }
}

/// Loads `.env` into the process environment if present.
pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServiceConfig::from_toml("").expect("empty TOML is valid");
        assert_eq!(config.feeds, FeedEndpoints::default());
        assert_eq!(config.nowcast.retry, 5);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.local_tz().unwrap(), chrono_tz::Asia::Hong_Kong);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = ServiceConfig::from_toml(
            r#"
            [feeds]
            en = "file:///srv/fixtures/CurrentWeather.xml"

            [nowcast]
            latitude = 22.2911095
            longitude = 114.2003418
            retry = 2

            [server]
            port = 9000

            [report]
            timezone = "UTC"
            "#,
        )
        .expect("valid TOML should parse");
        assert_eq!(config.feeds.en, "file:///srv/fixtures/CurrentWeather.xml");
        assert_eq!(config.nowcast.retry, 2);
        assert_eq!(config.nowcast.renderer_program, "node");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.local_tz().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let config = ServiceConfig::from_toml("[report]\ntimezone = \"Mars/Olympus\"").unwrap();
        assert!(matches!(config.local_tz(), Err(ConfigError::Timezone(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.webhook.base_url, IFTTT_MAKER_BASE_URL);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a port\"").unwrap();
        let err = ServiceConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {:?}", err);
    }

    #[test]
    fn test_env_key_used_without_flag() {
        let config = ServiceConfig::from_toml("[webhook]\nkey = \"from-file\"").unwrap();
        assert_eq!(
            config.pick_api_key(None, Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_empty_flag_falls_through_to_env() {
        let config = ServiceConfig::from_toml("[webhook]\nkey = \"from-file\"").unwrap();
        assert_eq!(
            config
                .pick_api_key(Some(String::new()), Some("from-env".to_string()))
                .as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_file_key_is_last_resort() {
        let config = ServiceConfig::from_toml("[webhook]\nkey = \"from-file\"").unwrap();
        assert_eq!(
            config.pick_api_key(Some(String::new()), Some(String::new())).as_deref(),
            Some("from-file")
        );
        let empty = ServiceConfig::from_toml("[webhook]\nkey = \"\"").unwrap();
        assert_eq!(empty.pick_api_key(None, None), None);
    }

    #[test]
    fn test_flag_key_wins() {
        let config = ServiceConfig::from_toml("[webhook]\nkey = \"from-file\"").unwrap();
        assert_eq!(
            config.resolve_api_key(Some("from-flag".to_string())).as_deref(),
            Some("from-flag")
        );
    }
}
