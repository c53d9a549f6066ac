use std::env;

use crate::error::ConfigError;

pub const DEFAULT_HTTP_PORT: u16 = 5000;
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_POOL_SIZE: usize = 10;

/// connection settings for the postgres pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub ssl: bool,
    pub pool_size: usize,
}

/// everything the main binary needs at boot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bot_token: String,
    pub http_port: u16,
    pub database: DatabaseConfig,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// reads settings through `lookup` so tests don't have to touch the process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        Ok(Self {
            host: required(&lookup, "DB_HOST")?,
            port: optional_port(&lookup, "DB_PORT", DEFAULT_DB_PORT)?,
            user: required(&lookup, "DB_USER")?,
            password: required(&lookup, "DB_PASSWORD")?,
            dbname: required(&lookup, "DB_NAME")?,
            ssl: optional_flag(&lookup, "DB_SSL")?,
            pool_size: DEFAULT_POOL_SIZE,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let bot_token = required(&lookup, "BOT_TOKEN")?;
        let database = DatabaseConfig::from_lookup(&lookup)?;
        let http_port = optional_port(&lookup, "PORT", DEFAULT_HTTP_PORT)?;

        Ok(Self {
            bot_token,
            http_port,
            database,
        })
    }
}

// empty values are treated the same as unset ones
fn lookup_non_empty<F>(lookup: &F, key: &'static str) -> Option<String>
where
    F: Fn(&'static str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    lookup_non_empty(lookup, key).ok_or(ConfigError::Missing(key))
}

fn optional_port<F>(lookup: &F, key: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup_non_empty(lookup, key) {
        Some(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid { var: key, value }),
        None => Ok(default),
    }
}

fn optional_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup_non_empty(lookup, key) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { var: key, value }),
        },
        None => Ok(false),
    }
}
