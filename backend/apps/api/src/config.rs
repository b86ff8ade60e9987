//! Server configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use auth::{AuthConfig, SigningSecret};
use platform::password::{
    DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM, HashingPolicy,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Deployment environment; selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Local,
    Dev,
    Prod,
}

impl std::str::FromStr for AppEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    /// Default filter directive when `RUST_LOG` is unset
    pub log_level: String,
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
    pub frontend_origins: Vec<String>,
    /// Absent means the in-memory store (debug builds only)
    pub database_url: Option<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Required | Default                  |
    /// |------------------------|----------|--------------------------|
    /// | `APP_ENV`              | no       | `local`                  |
    /// | `LOG_LEVEL`            | no       | `info`                   |
    /// | `HOST`                 | no       | `0.0.0.0`                |
    /// | `PORT`                 | no       | `31113`                  |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `10`                     |
    /// | `FRONTEND_ORIGINS`     | no       | `http://localhost:40922` |
    /// | `DATABASE_URL`         | release  | --                       |
    /// | `TOKEN_SECRET`         | **yes**  | -- (base64)              |
    /// | `TOKEN_TTL_SECS`       | no       | `3600`                   |
    /// | `HASH_MEMORY_KIB`      | no       | `19456`                  |
    /// | `HASH_ITERATIONS`      | no       | `2`                      |
    /// | `HASH_PARALLELISM`     | no       | `1`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env: AppEnv = parse_or(&lookup, "APP_ENV", AppEnv::Local)?;
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let host: IpAddr = parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port: u16 = parse_or(&lookup, "PORT", 31113)?;
        let request_timeout = Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?);

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| "http://localhost:40922,http://127.0.0.1:40922".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let secret_b64 = lookup("TOKEN_SECRET").ok_or(ConfigError::Missing("TOKEN_SECRET"))?;
        let secret = platform::crypto::from_base64(&secret_b64).map_err(|e| {
            ConfigError::Invalid {
                name: "TOKEN_SECRET",
                reason: e.to_string(),
            }
        })?;
        if secret.is_empty() {
            return Err(ConfigError::Invalid {
                name: "TOKEN_SECRET",
                reason: "decodes to an empty key".to_string(),
            });
        }

        let token_ttl = Duration::from_secs(parse_or(&lookup, "TOKEN_TTL_SECS", 3600)?);
        let hashing = HashingPolicy {
            memory_kib: parse_or(&lookup, "HASH_MEMORY_KIB", DEFAULT_MEMORY_KIB)?,
            iterations: parse_or(&lookup, "HASH_ITERATIONS", DEFAULT_ITERATIONS)?,
            parallelism: parse_or(&lookup, "HASH_PARALLELISM", DEFAULT_PARALLELISM)?,
        };

        let auth = AuthConfig::new(SigningSecret::new(secret))
            .with_token_ttl(token_ttl)
            .with_hashing(hashing);

        Ok(Self {
            env,
            log_level,
            host,
            port,
            request_timeout,
            frontend_origins,
            database_url,
            auth,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}
