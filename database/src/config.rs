use std::str::FromStr;

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::DatabaseError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Selects the process-local [`MemoryRecordStore`](crate::MemoryRecordStore)
/// instead of SQLite.
pub const MEMORY_STORE_URL: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    20
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            pool_size: default_pool_size(),
        }
    }
}

impl DatabaseConfig {
    pub fn resolve(
        cli_arg: Option<String>,
        env_value: Option<String>,
        yaml_config: Option<String>,
    ) -> Self {
        let url = if let Some(arg) = cli_arg {
            arg
        } else if let Some(env) = env_value.filter(|value| !value.trim().is_empty()) {
            env
        } else if let Some(yaml) = yaml_config {
            yaml
        } else {
            DEFAULT_DATABASE_URL.to_string()
        };

        Self {
            url,
            pool_size: default_pool_size(),
        }
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    pub fn is_memory_store(&self) -> bool {
        self.url == MEMORY_STORE_URL
    }

    pub fn is_in_memory_sqlite(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    pub async fn create_pool(&self) -> Result<sqlx::SqlitePool, DatabaseError> {
        let connect_options = SqliteConnectOptions::from_str(&self.url)
            .map_err(|e| DatabaseError::Connection(e.to_string()))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(self.pool_size.max(1));
        if self.is_in_memory_sqlite() {
            // an in-memory database lives only as long as one of its connections
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Ok(pool)
    }
}
