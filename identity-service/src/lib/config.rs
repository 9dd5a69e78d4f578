use std::env;

use auth::jwt::parse_algorithm;
use auth::PasswordHasher;
use auth::TokenCodec;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::identity::models::Role;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub token: TokenConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Origins allowed by CORS; empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Deserialize, Clone)]
pub struct TokenConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_expire_minutes")]
    pub expire_minutes: i64,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("expire_minutes", &self.expire_minutes)
            .finish()
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_expire_minutes() -> i64 {
    30
}

/// Argon2 work factor. Unset fields fall back to the argon2 crate defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PasswordConfig {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    #[serde(default = "default_role")]
    pub default_role: Role,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            default_role: default_role(),
        }
    }
}

fn default_role() -> Role {
    Role::Guest
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TOKEN__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// The loaded configuration is validated before it is returned.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: TOKEN__SECRET=... overrides token.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values the core cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.secret.is_empty() {
            return Err(ConfigError::Message("token.secret must not be empty".into()));
        }
        if self.token.expire_minutes <= 0 {
            return Err(ConfigError::Message(
                "token.expire_minutes must be positive".into(),
            ));
        }
        if self.token.expire_minutes > TokenCodec::MAX_EXPIRE_MINUTES {
            return Err(ConfigError::Message(format!(
                "token.expire_minutes must be at most {}",
                TokenCodec::MAX_EXPIRE_MINUTES
            )));
        }
        parse_algorithm(&self.token.algorithm)
            .map_err(|e| ConfigError::Message(format!("token.algorithm: {}", e)))?;
        self.password.hasher()?;

        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "database.url is required for the postgres backend".into(),
            ));
        }

        Ok(())
    }

    pub fn token_codec(&self) -> Result<TokenCodec, ConfigError> {
        TokenCodec::from_algorithm_name(
            self.token.secret.as_bytes(),
            &self.token.algorithm,
            self.token.expire_minutes,
        )
        .map_err(|e| ConfigError::Message(format!("token: {}", e)))
    }
}

impl PasswordConfig {
    pub fn hasher(&self) -> Result<PasswordHasher, ConfigError> {
        if self.memory_kib.is_none() && self.iterations.is_none() && self.parallelism.is_none() {
            return Ok(PasswordHasher::new());
        }

        PasswordHasher::with_params(
            self.memory_kib.unwrap_or(PasswordHasher::DEFAULT_MEMORY_KIB),
            self.iterations.unwrap_or(PasswordHasher::DEFAULT_ITERATIONS),
            self.parallelism.unwrap_or(PasswordHasher::DEFAULT_PARALLELISM),
        )
        .map_err(|e| ConfigError::Message(format!("password: {}", e)))
    }
}
