use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSTORE_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSTORE_CONFIG_DIR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub kv: KvSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay
    /// and `BOOKSTORE_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let parsed_environment: Environment = environment.parse()?;

        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::current_dir()
                    .map(|cwd| cwd.join("config"))
                    .unwrap_or_else(|_| PathBuf::from("config"))
            });

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        // BOOKSTORE_SERVER__PORT=9000 -> server.port
        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix("BOOKSTORE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8081
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Which search gateway implementation to wire at startup.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    #[default]
    OpenSearch,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub backend: SearchBackend,
    #[serde(default = "SearchSettings::default_url")]
    pub url: String,
    #[serde(default = "SearchSettings::default_index")]
    pub index: String,
    #[serde(default = "SearchSettings::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SearchSettings {
    fn default_url() -> String {
        "http://localhost:9200".to_string()
    }

    fn default_index() -> String {
        "books".to_string()
    }

    fn default_timeout_ms() -> u64 {
        10000
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            backend: SearchBackend::default(),
            url: Self::default_url(),
            index: Self::default_index(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

/// Which activity log implementation to wire at startup.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KvBackend {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KvSettings {
    #[serde(default)]
    pub backend: KvBackend,
    #[serde(default = "KvSettings::default_url")]
    pub url: String,
    /// Prepended to the user name to form the list key.
    #[serde(default)]
    pub key_prefix: String,
    /// Upper bound on every key-value store call, connecting included.
    #[serde(default = "KvSettings::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl KvSettings {
    fn default_url() -> String {
        "redis://localhost:6379".to_string()
    }

    fn default_timeout_ms() -> u64 {
        1000
    }
}

impl Default for KvSettings {
    fn default() -> Self {
        Self {
            backend: KvBackend::default(),
            url: Self::default_url(),
            key_prefix: String::new(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_log_filter")]
    pub log_filter: String,
}

impl TelemetrySettings {
    fn default_log_filter() -> String {
        "info,tower_http=info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: Self::default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_backends_point_at_localhost() {
        let settings = Settings::default();
        assert_eq!(settings.search.backend, SearchBackend::OpenSearch);
        assert_eq!(settings.search.url, "http://localhost:9200");
        assert_eq!(settings.search.index, "books");
        assert_eq!(settings.kv.backend, KvBackend::Redis);
        assert_eq!(settings.kv.url, "redis://localhost:6379");
        assert_eq!(settings.kv.timeout_ms, 1000);
        assert_eq!(settings.server.port, 8081);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!("qa".parse::<Environment>().is_err());
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [search]
                backend = "memory"

                [kv]
                key_prefix = "activity:"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let settings: Settings = cfg.try_deserialize().unwrap();

        assert_eq!(settings.search.backend, SearchBackend::Memory);
        assert_eq!(settings.search.index, "books");
        assert_eq!(settings.kv.key_prefix, "activity:");
        assert_eq!(settings.kv.backend, KvBackend::Redis);
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }
}
