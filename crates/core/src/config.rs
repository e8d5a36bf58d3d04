//! Process configuration assembled from environment variables.

use std::fmt;
use std::time::Duration;

use crate::constants::{
    DB_CONNECT_MAX_ATTEMPTS, DB_CONNECT_RETRY_DELAY_SECS, DEFAULT_SERVER_PORT,
    PG_POOL_ACQUIRE_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS,
};
use crate::env_config::{env_flag, env_parse_with_default, env_string};
use crate::error::{Result, TrackerError};

/// Where the database lives: a full URL, or discrete `POSTGRES_*` parts.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        dbname: String,
        sslmode: String,
    },
}

impl fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(_) => f.write_str("Url(<redacted>)"),
            Self::Parts { host, port, user, dbname, sslmode, .. } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("dbname", dbname)
                .field("sslmode", sslmode)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    /// Attempts made by the startup handshake before giving up.
    pub max_attempts: u32,
    /// Fixed pause between two startup attempts.
    pub retry_delay: Duration,
    /// How long one attempt waits for a pooled connection.
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            target: DatabaseTarget::Url(url.into()),
            max_attempts: DB_CONNECT_MAX_ATTEMPTS,
            retry_delay: Duration::from_secs(DB_CONNECT_RETRY_DELAY_SECS),
            acquire_timeout: Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS),
        }
    }

    /// `DATABASE_URL` wins; otherwise `POSTGRES_HOST`, `POSTGRES_PORT`,
    /// `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_DB` and
    /// `POSTGRES_SSLMODE` are combined.
    pub fn from_env() -> Result<Self> {
        let target = if let Some(url) = env_string("DATABASE_URL") {
            DatabaseTarget::Url(url)
        } else {
            let user = env_string("POSTGRES_USER").ok_or_else(|| {
                TrackerError::Config("DATABASE_URL or POSTGRES_USER must be set".to_owned())
            })?;
            DatabaseTarget::Parts {
                host: env_string("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_owned()),
                port: env_parse_with_default("POSTGRES_PORT", 5432),
                dbname: env_string("POSTGRES_DB").unwrap_or_else(|| user.clone()),
                password: env_string("POSTGRES_PASSWORD").unwrap_or_default(),
                sslmode: env_string("POSTGRES_SSLMODE").unwrap_or_else(|| "prefer".to_owned()),
                user,
            }
        };
        let max_attempts =
            env_parse_with_default("DB_CONNECT_MAX_ATTEMPTS", DB_CONNECT_MAX_ATTEMPTS).max(1);
        let retry_delay = Duration::from_secs(env_parse_with_default(
            "DB_CONNECT_RETRY_DELAY_SECS",
            DB_CONNECT_RETRY_DELAY_SECS,
        ));
        let acquire_timeout = Duration::from_secs(env_parse_with_default(
            "DB_ACQUIRE_TIMEOUT_SECS",
            PG_POOL_ACQUIRE_TIMEOUT_SECS,
        ));
        Ok(Self { target, max_attempts, retry_delay, acquire_timeout })
    }
}

/// How bearer tokens are turned into identities.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// Userinfo-style endpoint the bearer token is forwarded to.
    pub verify_url: Option<String>,
    /// Fixed `token -> uid` pairs for local development.
    pub static_tokens: Vec<(String, String)>,
    /// Create an account row on the first authenticated request.
    pub auto_create_account: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("verify_url", &self.verify_url)
            .field("static_tokens", &self.static_tokens.len())
            .field("auto_create_account", &self.auto_create_account)
            .finish()
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        let static_tokens = match env_string("OCDTRACKER_STATIC_TOKENS") {
            Some(raw) => parse_static_tokens(&raw)?,
            None => Vec::new(),
        };
        Ok(Self {
            verify_url: env_string("IDENTITY_VERIFY_URL"),
            static_tokens,
            auto_create_account: env_flag("OCDTRACKER_AUTO_CREATE_ACCOUNT", false),
        })
    }
}

/// Parse `token=uid,token2=uid2`.
pub fn parse_static_tokens(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((token, uid)) if !token.trim().is_empty() && !uid.trim().is_empty() => {
                Ok((token.trim().to_owned(), uid.trim().to_owned()))
            },
            _ => Err(TrackerError::Config(format!(
                "OCDTRACKER_STATIC_TOKENS entry must look like token=uid, got '{pair}'"
            ))),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_string("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: env_parse_with_default("SERVER_PORT", DEFAULT_SERVER_PORT),
            request_timeout: Duration::from_secs(env_parse_with_default(
                "REQUEST_TIMEOUT_SECS",
                REQUEST_TIMEOUT_SECS,
            )),
        }
    }
}

/// Everything the `serve` command needs.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            server: ServerConfig::from_env(),
        })
    }
}
