use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::auth::{DEFAULT_TOKEN_LIFETIME_MINUTES, MIN_JWT_SECRET_LEN};
use crate::constants::ingest::{DEFAULT_CONNECT_ATTEMPTS, DEFAULT_CONNECT_DELAY};
use crate::constants::pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub catalog: CatalogConfig,

    pub ingest: IngestConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_url: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/flixdex.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,

    pub port: u16,

    /// `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            cors_allowed_origins: vec![
                "http://localhost:8000".to_string(),
                "http://127.0.0.1:8000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HS256 signing secret for access tokens. Never defaulted; set it here
    /// or through `FLIXDEX_JWT_SECRET`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,

    pub token_lifetime_minutes: i64,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_lifetime_minutes: DEFAULT_TOKEN_LIFETIME_MINUTES,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Page size used when a search does not pass `per_page`.
    pub default_per_page: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Dataset loaded by `flixdex load` when no path is given.
    pub csv_path: PathBuf,

    pub connect_attempts: u32,

    pub connect_delay_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/netflix_titles.csv"),
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_delay_secs: DEFAULT_CONNECT_DELAY.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    /// Emit log lines as JSON instead of human readable text.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            json_logs: false,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = paths
            .iter()
            .find(|path| path.exists())
            .map_or_else(
                || {
                    info!("No config file found, using defaults");
                    Ok(Self::default())
                },
                |path| {
                    info!("Loading config from: {}", path.display());
                    Self::load_from_path(path)
                },
            )?;

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Overrides file settings with `FLIXDEX_*` variables.
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FLIXDEX_DATABASE_URL") {
            self.general.database_url = url;
        }

        if let Some(secret) = lookup("FLIXDEX_JWT_SECRET") {
            self.security.jwt_secret = Some(secret);
        }

        if let Some(port) = lookup("FLIXDEX_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("FLIXDEX_PORT is not a valid port: {port}"))?;
        }

        if let Some(level) = lookup("FLIXDEX_LOG_LEVEL") {
            self.general.log_level = level;
        }

        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("flixdex").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".flixdex").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!(
                "min_db_connections ({}) exceeds max_db_connections ({})",
                self.general.min_db_connections,
                self.general.max_db_connections
            );
        }

        if self.security.token_lifetime_minutes <= 0 {
            anyhow::bail!("Token lifetime must be > 0 minutes");
        }

        if !(1..=MAX_PER_PAGE).contains(&self.catalog.default_per_page) {
            anyhow::bail!(
                "catalog.default_per_page must be between 1 and {MAX_PER_PAGE}"
            );
        }

        if let Some(secret) = &self.security.jwt_secret
            && secret.len() < MIN_JWT_SECRET_LEN
        {
            anyhow::bail!("JWT secret must be at least {MIN_JWT_SECRET_LEN} bytes");
        }

        Ok(())
    }

    /// The signing secret, required by anything that issues or checks tokens.
    pub fn jwt_secret(&self) -> Result<&str> {
        self.security.jwt_secret.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "No JWT secret configured; set security.jwt_secret or FLIXDEX_JWT_SECRET"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.max_db_connections, 5);
        assert_eq!(config.security.token_lifetime_minutes, 30);
        assert_eq!(config.catalog.default_per_page, 20);
        assert_eq!(config.ingest.connect_attempts, 30);
        assert!(config.security.jwt_secret.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[security]"));
        assert!(toml_str.contains("[ingest]"));
        assert!(!toml_str.contains("jwt_secret"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security]
            token_lifetime_minutes = 60
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.security.token_lifetime_minutes, 60);

        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FLIXDEX_DATABASE_URL", "sqlite::memory:"),
            ("FLIXDEX_JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("FLIXDEX_PORT", "9001"),
            ("FLIXDEX_LOG_LEVEL", "warn"),
        ]);

        let mut config = Config::default();
        config
            .apply_env_overrides(|k| env.get(k).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.general.database_url, "sqlite::memory:");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(
            config.jwt_secret().unwrap(),
            "0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn bad_port_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|k| {
            (k == "FLIXDEX_PORT").then(|| "eighty".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_short_secret() {
        let mut config = Config::default();
        config.security.jwt_secret = Some("short".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_page() {
        let mut config = Config::default();
        config.catalog.default_per_page = MAX_PER_PAGE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(Config::default().jwt_secret().is_err());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.port = 8123;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.server.port, 8123);
    }
}
