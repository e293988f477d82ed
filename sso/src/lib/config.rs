use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::auth::token::MAX_TTL_SECONDS;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub env: Env,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub grpc: GrpcConfig,
}

/// Deployment environment; selects the log format and level.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Local,
    Dev,
    #[default]
    Prod,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// SQLite database file, or `:memory:`
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub token_ttl_seconds: i64,
    #[serde(default)]
    pub password: PasswordHashConfig,
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrpcConfig {
    pub port: u16,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl GrpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SSO__GRPC__PORT, SSO__STORAGE__PATH, etc.)
    /// 2. The file named by CONFIG_PATH, when set
    /// 3. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = match env::var("CONFIG_PATH") {
            Ok(path) => ConfigBuilder::builder().add_source(File::with_name(&path)),
            Err(_) => {
                let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "local".to_string());

                ConfigBuilder::builder()
                    .add_source(File::with_name("config/default").required(false))
                    .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            }
        };

        // Example: SSO__STORAGE__PATH=./storage/sso.db overrides storage.path
        builder = builder.add_source(Environment::with_prefix("SSO").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_seconds <= 0 {
            return Err(ConfigError::Message(format!(
                "auth.token_ttl_seconds must be positive, got {}",
                self.auth.token_ttl_seconds
            )));
        }

        if self.auth.token_ttl_seconds > MAX_TTL_SECONDS {
            return Err(ConfigError::Message(format!(
                "auth.token_ttl_seconds must not exceed {}, got {}",
                MAX_TTL_SECONDS, self.auth.token_ttl_seconds
            )));
        }

        if self.grpc.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "grpc.timeout_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_seconds(self.auth.token_ttl_seconds).ok_or_else(|| {
            ConfigError::Message(format!(
                "auth.token_ttl_seconds is out of range: {}",
                self.auth.token_ttl_seconds
            ))
        })
    }
}
