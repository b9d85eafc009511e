//! Capability persistence for agora.
//!
//! This crate attaches reusable behaviours to any target table:
//! - Likes (`Likeable<Target>` relation table)
//! - Owner lookups and deletes on the target table itself
//! - Precomputed recommendations (`<Target>Recommendation` relation table)
//!
//! Table names reach SQL text only as validated [`agora_core::TableIdentifier`]s;
//! all values are bound as parameters.

pub mod error;
pub mod postgres;
pub mod repos;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use postgres::PostgresStore;
pub use repos::{DeletableRepo, LikeableRepo, OwnableRepo, RecommendableRepo};
pub use store::{CapabilityStore, SqliteStore};

use agora_core::config::DatabaseConfig;
use std::sync::Arc;

/// Create a capability store from configuration.
pub async fn from_config(config: &DatabaseConfig) -> StoreResult<Arc<dyn CapabilityStore>> {
    config.validate().map_err(StoreError::Config)?;
    match config {
        DatabaseConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn CapabilityStore>)
        }
        DatabaseConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            ssl_mode,
            max_connections,
            statement_timeout_ms,
        } => {
            let store = if let Some(url) = url {
                PostgresStore::from_url(url, *max_connections, *statement_timeout_ms).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *ssl_mode,
                    *max_connections,
                    *statement_timeout_ms,
                )
                .await?
            } else {
                return Err(StoreError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn CapabilityStore>)
        }
    }
}
