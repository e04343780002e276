// src/config.rs

use std::{env, fmt, net::SocketAddr};

use dotenvy::dotenv;

/// Default lifetime of a session token: one day.
pub const DEFAULT_JWT_EXPIRATION: u64 = 86_400;

/// Longest accepted session token lifetime: one year.
pub const MAX_JWT_EXPIRATION: u64 = 365 * 86_400;

/// Shortest HMAC secret accepted for signing session tokens.
pub const MIN_JWT_SECRET_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub database_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub log_dir: String,
    pub hash: HashConfig,
}

/// Argon2 cost parameters. `None` keeps the argon2 crate default.
#[derive(Debug, Clone, Default)]
pub struct HashConfig {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} must be set", name),
            ConfigError::Invalid { name, value } => {
                write!(f, "{} has an invalid value: {:?}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                value: format!("<{} bytes>", jwt_secret.len()),
            });
        }

        let jwt_expiration: u64 = parse_or(&lookup, "JWT_EXPIRATION", DEFAULT_JWT_EXPIRATION)?;
        if jwt_expiration == 0 || jwt_expiration > MAX_JWT_EXPIRATION {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRATION",
                value: jwt_expiration.to_string(),
            });
        }

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let bind_addr = parse_or(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 8000)),
        )?;

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();

        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string());

        let hash = HashConfig {
            memory_kib: parse_optional(&lookup, "HASH_MEMORY_KIB")?,
            iterations: parse_optional(&lookup, "HASH_ITERATIONS")?,
            parallelism: parse_optional(&lookup, "HASH_PARALLELISM")?,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            database_max_connections,
            cors_origins,
            log_dir,
            hash,
        })
    }
}

fn parse_optional<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    Ok(parse_optional(lookup, name)?.unwrap_or(default))
}
