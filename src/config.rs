//! Environment-driven configuration.
//!
//! Every setting has a documented default so a development checkout runs
//! with nothing but a local PostgreSQL.

use std::{env, path::PathBuf, str::FromStr};

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

pub const DEFAULT_JWT_SECRET: &str = "promibol-dev-secret";
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}")]
    Invalid { var: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Takes precedence over the individual `DB_*` parameters when set.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|value| !value.trim().is_empty()),
            host: text("DB_HOST", "localhost"),
            port: parsed(&lookup, "DB_PORT", 5432)?,
            user: text("DB_USER", "postgres"),
            password: text("DB_PASSWORD", "password"),
            name: text("DB_NAME", "promibol"),
            max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 5)?,
        };

        let server = ServerConfig {
            host: text("HOST", "0.0.0.0"),
            port: parsed(&lookup, "PORT", 5000)?,
            cors_origin: text("CORS_ORIGIN", "http://localhost:3000"),
        };

        let auth = AuthConfig {
            jwt_secret: text("JWT_SECRET", DEFAULT_JWT_SECRET),
        };

        let uploads = UploadConfig {
            dir: PathBuf::from(text("UPLOAD_DIR", "./public/uploads")),
            max_bytes: parsed(&lookup, "UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
        };

        let seed_demo_data = match lookup("SEED_DEMO_DATA").as_deref().map(str::trim) {
            None | Some("") | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "SEED_DEMO_DATA",
                    value: other.to_string(),
                })
            }
        };

        Ok(Config {
            database,
            server,
            auth,
            uploads,
            seed_demo_data,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.auth.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url)
                .map_err(|err| ConfigError::DatabaseUrl(err.to_string())),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name)),
        }
    }
}

fn parsed<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| ConfigError::Invalid { var, value })
        }
        _ => Ok(default),
    }
}
