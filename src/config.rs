use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KlinikiConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub geocoder: GeocoderConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    /// `"nominatim"` or `"google"`.
    pub provider: String,
    /// Overrides the provider's public endpoint.
    pub base_url: Option<String>,
    pub user_agent: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Appended to queries that mention none of `country_hints`.
    pub default_country: String,
    /// ISO 3166-1 alpha-2 code passed to providers that support a country bias.
    pub country_code: Option<String>,
    pub country_hints: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub default_radius_km: f64,
    pub referral_limit: usize,
    pub county_limit: usize,
}

impl Default for KlinikiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            geocoder: GeocoderConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 8765,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_kliniki_dir()
            .join("facilities.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: "nominatim".into(),
            base_url: None,
            user_agent: concat!("kliniki/", env!("CARGO_PKG_VERSION")).into(),
            api_key: None,
            timeout_secs: 10,
            default_country: "Kenya".into(),
            country_code: Some("ke".into()),
            country_hints: vec!["kenya".into()],
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 20.0,
            referral_limit: 10,
            county_limit: 50,
        }
    }
}

impl GeocoderConfig {
    /// Provider timeout, clamped to 1..=10 seconds.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.clamp(1, 10))
    }

    /// Configured endpoint, or the public one for the selected provider.
    pub fn endpoint(&self) -> &str {
        match (&self.base_url, self.provider.as_str()) {
            (Some(url), _) => url.trim_end_matches('/'),
            (None, "google") => "https://maps.googleapis.com",
            (None, _) => "https://nominatim.openstreetmap.org",
        }
    }
}

/// Returns `~/.kliniki/`, or `./.kliniki` when no home directory is available.
pub fn default_kliniki_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kliniki")
}

/// Returns the default config file path: `~/.kliniki/config.toml`
pub fn default_config_path() -> PathBuf {
    default_kliniki_dir().join("config.toml")
}

impl KlinikiConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            KlinikiConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (KLINIKI_DB, KLINIKI_LOG_LEVEL, KLINIKI_GEOCODER, KLINIKI_GEOCODER_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("KLINIKI_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("KLINIKI_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("KLINIKI_GEOCODER") {
            self.geocoder.provider = val;
        }
        if let Ok(val) = std::env::var("KLINIKI_GEOCODER_KEY") {
            self.geocoder.api_key = Some(val);
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
