use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Email of the bootstrap admin account created on first startup.
    pub admin_email: String,
    /// Password for the bootstrap admin. Generated and logged when unset.
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory media buckets live under.
    pub media_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("./media"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Seconds a cached catalog page stays fresh.
    pub cache_ttl_secs: u64,
    /// Maximum number of distinct filter combinations kept in the cache.
    pub cache_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 120,
            cache_capacity: 256,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.admin_email", "admin@campus.local")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CAMPUS__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("CAMPUS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
