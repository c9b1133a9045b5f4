use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "config/necessity";

/// Application config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reconcile: ReconcileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// rows per UPDATE statement inside the write transaction
    pub chunk_size: usize,
    pub write_timeout_secs: u64,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/necessity".to_string(),
            },
            reconcile: ReconcileConfig {
                chunk_size: 1000,
                write_timeout_secs: 30,
                export_dir: None,
            },
        }
    }
}

impl AppConfig {
    /// Defaults, then `config/necessity.{toml,json,...}` if present, then env.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(DEFAULT_CONFIG_FILE, |key| std::env::var(key).ok())
    }

    /// Same layering with an explicit file name and env lookup.
    pub fn load_with<F>(file: &str, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .set_default("reconcile.chunk_size", defaults.reconcile.chunk_size as i64)?
            .set_default(
                "reconcile.write_timeout_secs",
                defaults.reconcile.write_timeout_secs as i64,
            )?
            .add_source(File::with_name(file).required(false))
            .set_override_option("server.host", env("SERVER_HOST"))?
            .set_override_option("server.port", env("SERVER_PORT"))?
            .set_override_option("database.url", env("DATABASE_URL"))?
            .set_override_option("reconcile.chunk_size", env("RECONCILE_CHUNK_SIZE"))?
            .set_override_option(
                "reconcile.write_timeout_secs",
                env("RECONCILE_WRITE_TIMEOUT_SECS"),
            )?
            .set_override_option("reconcile.export_dir", env("RECONCILE_EXPORT_DIR"))?
            .build()?
            .try_deserialize()
    }
}
