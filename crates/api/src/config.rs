//! Process configuration, read from the environment at startup.
//!
//! There are no fallbacks for secrets: a missing `JWT_SECRET` or admin
//! credential aborts startup.

use std::net::SocketAddr;

use thiserror::Error;

use dealerhub_auth::AdminCredential;
use dealerhub_observability::LogFormat;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub admin: AdminCredential,
    pub admin_username: String,
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
    /// Take the client address from `X-Forwarded-For`. Only safe behind a
    /// reverse proxy that overwrites the header.
    pub trust_proxy: bool,
    pub log_format: LogFormat,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("admin", &self.admin)
            .field("admin_username", &self.admin_username)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("bind_addr", &self.bind_addr)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("cookie_secure", &self.cookie_secure)
            .field("trust_proxy", &self.trust_proxy)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment, honouring a `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let admin = match (get("ADMIN_PASSWORD_HASH"), get("ADMIN_PASSWORD")) {
            (Some(hash), _) => AdminCredential::Hashed(hash),
            (None, Some(plain)) => AdminCredential::Plain(plain),
            (None, None) => return Err(ConfigError::Missing("ADMIN_PASSWORD_HASH or ADMIN_PASSWORD")),
        };

        let bind_addr = match get("BIND_ADDR") {
            Some(addr) => addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "BIND_ADDR",
                message: e.to_string(),
            })?,
            None => {
                let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let bcrypt_cost = parse_or("BCRYPT_COST", get("BCRYPT_COST"), DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                var: "BCRYPT_COST",
                message: format!("{bcrypt_cost} is outside 4..=31"),
            });
        }

        Ok(Self {
            jwt_secret,
            admin,
            admin_username: get("ADMIN_USERNAME").unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
            database_url: get("DATABASE_URL"),
            bind_addr,
            bcrypt_cost,
            cookie_secure: parse_or("COOKIE_SECURE", get("COOKIE_SECURE"), false)?,
            trust_proxy: parse_or("TRUST_PROXY", get("TRUST_PROXY"), false)?,
            log_format: parse_or("LOG_FORMAT", get("LOG_FORMAT"), LogFormat::Json)?,
        })
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            message: e.to_string(),
        }),
    }
}
