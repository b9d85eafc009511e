//! Capability store harnesses for SQLite and PostgreSQL.

use agora_core::TableIdentifier;
use agora_store::{CapabilityStore, PostgresStore, SqliteStore, StoreError, StoreResult};
use std::sync::Arc;
use tempfile::TempDir;
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;

/// Stable prefix for Docker/container startup failures in Postgres test setup.
pub const POSTGRES_CONTAINER_START_ERR_PREFIX: &str = "postgres-container-start:";

enum Backend {
    Sqlite {
        store: Arc<SqliteStore>,
        _temp_dir: TempDir,
    },
    Postgres {
        store: Arc<PostgresStore>,
        _container: ContainerAsync<Postgres>,
    },
}

/// A test capability store that cleans up on drop.
pub struct TestStore {
    backend: Backend,
}

impl TestStore {
    /// File-backed SQLite store in a temp directory.
    pub async fn sqlite() -> StoreResult<Self> {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let store = SqliteStore::new(temp_dir.path().join("test.db")).await?;
        Ok(Self {
            backend: Backend::Sqlite {
                store: Arc::new(store),
                _temp_dir: temp_dir,
            },
        })
    }

    /// PostgreSQL store in a throwaway container.
    pub async fn postgres() -> StoreResult<Self> {
        let container = Postgres::default()
            .with_tag("15-alpine")
            .start()
            .await
            .map_err(|e| {
                StoreError::Internal(format!(
                    "{} Failed to start PostgreSQL container: {e}",
                    POSTGRES_CONTAINER_START_ERR_PREFIX
                ))
            })?;

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get port");

        // Default credentials from testcontainers-modules postgres
        let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
        let store = PostgresStore::from_url(&url, 5, None).await?;

        Ok(Self {
            backend: Backend::Postgres {
                store: Arc::new(store),
                _container: container,
            },
        })
    }

    pub fn store(&self) -> Arc<dyn CapabilityStore> {
        match &self.backend {
            Backend::Sqlite { store, .. } => store.clone(),
            Backend::Postgres { store, .. } => store.clone(),
        }
    }

    /// Create a target table with `id` and `owner_id` columns and insert `(id, owner)` rows.
    pub async fn create_target(&self, table: &TableIdentifier, rows: &[(&str, &str)]) {
        let ddl =
            format!("CREATE TABLE IF NOT EXISTS {table} (id TEXT PRIMARY KEY, owner_id TEXT NOT NULL)");
        match &self.backend {
            Backend::Sqlite { store, .. } => {
                sqlx::query(&ddl).execute(store.pool()).await.unwrap();
                let insert = format!("INSERT INTO {table} (id, owner_id) VALUES (?, ?)");
                for (id, owner) in rows {
                    sqlx::query(&insert)
                        .bind(*id)
                        .bind(*owner)
                        .execute(store.pool())
                        .await
                        .unwrap();
                }
            }
            Backend::Postgres { store, .. } => {
                sqlx::query(&ddl).execute(store.pool()).await.unwrap();
                let insert = format!("INSERT INTO {table} (id, owner_id) VALUES ($1, $2)");
                for (id, owner) in rows {
                    sqlx::query(&insert)
                        .bind(*id)
                        .bind(*owner)
                        .execute(store.pool())
                        .await
                        .unwrap();
                }
            }
        }
    }
}

/// Run a test against both SQLite and PostgreSQL backends.
///
/// PostgreSQL is skipped when Docker is unavailable or SKIP_POSTGRES_TESTS is set.
pub async fn run_store_test_both<F, Fut>(test_fn: F)
where
    F: Fn(TestStore) -> Fut + Clone,
    Fut: std::future::Future<Output = ()>,
{
    let sqlite = TestStore::sqlite()
        .await
        .expect("Failed to create SQLite test store");
    test_fn.clone()(sqlite).await;

    if std::env::var("SKIP_POSTGRES_TESTS").is_err() {
        match TestStore::postgres().await {
            Ok(postgres) => test_fn(postgres).await,
            Err(err) => {
                let msg = err.to_string();
                if msg.contains(POSTGRES_CONTAINER_START_ERR_PREFIX) {
                    eprintln!("Skipping PostgreSQL capability tests: {msg}");
                } else {
                    panic!("PostgreSQL test setup failed: {msg}");
                }
            }
        }
    }
}
