use anyhow::{bail, Context, Result};

use crate::models::user::UpsertUser;

/// Which `ResearchStore` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    /// Required when `storage_backend` is `Postgres`.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub port: u16,
    pub rust_log: String,
    /// Identity stamped on authored rows when a request does not name one.
    pub default_user_id: String,
    pub default_user_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend =
            StorageBackend::parse(&env_or("STORAGE_BACKEND", "postgres"))?;
        let database_url = std::env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("Required environment variable 'DATABASE_URL' is not set");
        }

        Ok(Config {
            storage_backend,
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            run_migrations: parse_bool(&env_or("RUN_MIGRATIONS", "true"))
                .context("RUN_MIGRATIONS must be true or false")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            default_user_id: env_or("DEFAULT_USER_ID", "mock-user-1"),
            default_user_email: env_or("DEFAULT_USER_EMAIL", "researcher@university.edu"),
        })
    }

    /// The user record upserted at startup so authored rows have an owner.
    pub fn default_user(&self) -> UpsertUser {
        UpsertUser {
            id: self.default_user_id.clone(),
            email: Some(self.default_user_email.clone()),
            first_name: Some("Alex".to_string()),
            last_name: Some("Researcher".to_string()),
            profile_image_url: None,
        }
    }

    /// Postgres URL, or an error naming the missing variable.
    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("Required environment variable 'DATABASE_URL' is not set")
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            run_migrations: false,
            port: 0,
            rust_log: "debug".to_string(),
            default_user_id: "mock-user-1".to_string(),
            default_user_email: "researcher@university.edu".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("not a boolean: '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse_accepts_aliases() {
        assert_eq!(StorageBackend::parse("Postgres").unwrap(), StorageBackend::Postgres);
        assert_eq!(StorageBackend::parse("pg").unwrap(), StorageBackend::Postgres);
        assert_eq!(StorageBackend::parse(" memory ").unwrap(), StorageBackend::Memory);
    }

    #[test]
    fn test_backend_parse_rejects_unknown() {
        assert!(StorageBackend::parse("sqlite").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_default_user_uses_configured_identity() {
        let config = Config::for_tests();
        let user = config.default_user();
        assert_eq!(user.id, "mock-user-1");
        assert_eq!(user.email.as_deref(), Some("researcher@university.edu"));
    }
}
