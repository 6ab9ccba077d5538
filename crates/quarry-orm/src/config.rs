//! Connection and naming settings.

use serde::{Deserialize, Serialize};

use quarry_core::TableResolver;

use crate::error::{OrmError, Result};

/// Environment variable holding the database URL.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable holding the table prefix.
pub const ENV_TABLE_PREFIX: &str = "QUARRY_TABLE_PREFIX";
/// Environment variable holding the pool size.
pub const ENV_MAX_CONNECTIONS: &str = "QUARRY_MAX_CONNECTIONS";

/// Settings shared by a database handle and the builders created from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Driver URL, e.g. `sqlite::memory:` or `sqlite://app.db`.
    pub database_url: String,
    /// Prefix prepended to every resolved table name.
    pub table_prefix: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            table_prefix: String::new(),
            max_connections: 1,
        }
    }
}

impl Config {
    /// Creates a configuration for `database_url` with no table prefix.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Sets the pool size.
    #[must_use]
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Parses a JSON document; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()
    }

    /// Reads `DATABASE_URL`, `QUARRY_TABLE_PREFIX` and
    /// `QUARRY_MAX_CONNECTIONS`, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            config.database_url = url;
        }
        if let Some(prefix) = lookup(ENV_TABLE_PREFIX) {
            config.table_prefix = prefix;
        }
        if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
            config.max_connections = raw.trim().parse().map_err(|_| {
                OrmError::Config(format!("{ENV_MAX_CONNECTIONS} must be a positive integer, got '{raw}'"))
            })?;
        }
        config.validate()
    }

    /// Returns the table resolver for the configured prefix.
    #[must_use]
    pub fn resolver(&self) -> TableResolver {
        TableResolver::new(self.table_prefix.clone())
    }

    fn validate(self) -> Result<Self> {
        if self.database_url.trim().is_empty() {
            return Err(OrmError::Config("database_url is empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(OrmError::Config("max_connections must be at least 1".to_string()));
        }
        Ok(self)
    }
}
