//! Capability store trait and the SQLite implementation.

use crate::error::{StoreError, StoreResult};
use crate::repos::{DeletableRepo, LikeableRepo, OwnableRepo, RecommendableRepo};
use agora_core::TableIdentifier;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// A relational backend that can attach capabilities to target tables.
///
/// `likeable` and `recommendable` create their relation tables on first use;
/// `ownable` and `deletable` act on the target table itself and assume it
/// already exists with `id` (and `owner_id`) columns.
#[async_trait]
pub trait CapabilityStore: Send + Sync {
    /// Short backend name for logs ("sqlite", "postgres").
    fn backend_name(&self) -> &'static str;

    /// Check database connectivity.
    async fn health_check(&self) -> StoreResult<()>;

    /// Attach the like capability to `target`.
    async fn likeable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn LikeableRepo>>;

    /// Attach the owner lookup capability to `target`.
    async fn ownable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn OwnableRepo>>;

    /// Attach the delete capability to `target`.
    async fn deletable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn DeletableRepo>>;

    /// Attach the recommendation capability to `target`.
    async fn recommendable(
        &self,
        target: &TableIdentifier,
    ) -> StoreResult<Arc<dyn RecommendableRepo>>;
}

/// SQLite-based capability store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) a SQLite database. `":memory:"` opens a private in-memory database.
    pub async fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let in_memory = path.as_os_str() == ":memory:";

        let opts = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        };
        // Prevent transient "database is locked" errors under concurrent access.
        let opts = opts.busy_timeout(Duration::from_secs(5));

        let mut pool_opts = SqlitePoolOptions::new().max_connections(1);
        if in_memory {
            // The database lives only as long as its connection.
            pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_opts.connect_with(opts).await?;

        tracing::info!(path = %path.display(), "Opened SQLite capability store");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl CapabilityStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn likeable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn LikeableRepo>> {
        let repo = sqlite_impl::SqliteLikeable::attach(self.pool.clone(), target.clone()).await?;
        Ok(Arc::new(repo))
    }

    async fn ownable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn OwnableRepo>> {
        Ok(Arc::new(sqlite_impl::SqliteOwnable {
            pool: self.pool.clone(),
            target: target.clone(),
        }))
    }

    async fn deletable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn DeletableRepo>> {
        Ok(Arc::new(sqlite_impl::SqliteDeletable {
            pool: self.pool.clone(),
            target: target.clone(),
        }))
    }

    async fn recommendable(
        &self,
        target: &TableIdentifier,
    ) -> StoreResult<Arc<dyn RecommendableRepo>> {
        let repo =
            sqlite_impl::SqliteRecommendable::attach(self.pool.clone(), target.clone()).await?;
        Ok(Arc::new(repo))
    }
}

// Capability repositories bound to one target table each.
mod sqlite_impl {
    use super::*;
    use crate::schema;
    use std::collections::HashSet;

    pub(super) struct SqliteLikeable {
        pool: Pool<Sqlite>,
        target: TableIdentifier,
        relation: TableIdentifier,
    }

    impl SqliteLikeable {
        pub(super) async fn attach(
            pool: Pool<Sqlite>,
            target: TableIdentifier,
        ) -> StoreResult<Self> {
            let relation = schema::likeable_table(&target)?;
            for statement in schema::likeable_ddl(&relation) {
                sqlx::query(&statement).execute(&pool).await?;
            }
            tracing::debug!(target_table = %target, relation = %relation, "Like relation ready");
            Ok(Self {
                pool,
                target,
                relation,
            })
        }
    }

    #[async_trait]
    impl LikeableRepo for SqliteLikeable {
        fn target(&self) -> &TableIdentifier {
            &self.target
        }

        async fn is_liked(&self, target_id: &str, user_id: &str) -> StoreResult<bool> {
            let sql = format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE target_id = ? AND liker_id = ?)",
                self.relation
            );
            let exists: bool = sqlx::query_scalar(&sql)
                .bind(target_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
            Ok(exists)
        }

        async fn like(&self, target_id: &str, user_id: &str) -> StoreResult<()> {
            let sql = format!(
                "INSERT INTO {} (target_id, liker_id) VALUES (?, ?)",
                self.relation
            );
            sqlx::query(&sql)
                .bind(target_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }

        async fn unlike(&self, target_id: &str, user_id: &str) -> StoreResult<()> {
            let sql = format!(
                "DELETE FROM {} WHERE target_id = ? AND liker_id = ?",
                self.relation
            );
            sqlx::query(&sql)
                .bind(target_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }

        async fn likes_count(&self, target_id: &str) -> StoreResult<u64> {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE target_id = ?", self.relation);
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(target_id)
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }

        async fn user_likes_count(&self, user_id: &str) -> StoreResult<u64> {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE liker_id = ?", self.relation);
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }

        async fn user_likes(&self, user_id: &str) -> StoreResult<Vec<String>> {
            let sql = format!("SELECT target_id FROM {} WHERE liker_id = ?", self.relation);
            let ids: Vec<String> = sqlx::query_scalar(&sql)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
            Ok(ids)
        }
    }

    pub(super) struct SqliteOwnable {
        pub(super) pool: Pool<Sqlite>,
        pub(super) target: TableIdentifier,
    }

    #[async_trait]
    impl OwnableRepo for SqliteOwnable {
        fn target(&self) -> &TableIdentifier {
            &self.target
        }

        async fn get_owner(&self, target_id: &str) -> StoreResult<String> {
            let sql = format!(
                "SELECT CAST(owner_id AS TEXT) FROM {} WHERE id = ?",
                self.target
            );
            let owner: Option<String> = sqlx::query_scalar(&sql)
                .bind(target_id)
                .fetch_optional(&self.pool)
                .await?;
            owner.ok_or_else(|| StoreError::NotFound(format!("{} {target_id}", self.target)))
        }
    }

    pub(super) struct SqliteDeletable {
        pub(super) pool: Pool<Sqlite>,
        pub(super) target: TableIdentifier,
    }

    #[async_trait]
    impl DeletableRepo for SqliteDeletable {
        fn target(&self) -> &TableIdentifier {
            &self.target
        }

        async fn delete(&self, target_id: &str) -> StoreResult<()> {
            let sql = format!("DELETE FROM {} WHERE id = ?", self.target);
            let result = sqlx::query(&sql)
                .bind(target_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(format!("{} {target_id}", self.target)));
            }
            Ok(())
        }
    }

    pub(super) struct SqliteRecommendable {
        pool: Pool<Sqlite>,
        target: TableIdentifier,
        relation: TableIdentifier,
    }

    impl SqliteRecommendable {
        pub(super) async fn attach(
            pool: Pool<Sqlite>,
            target: TableIdentifier,
        ) -> StoreResult<Self> {
            let relation = schema::recommendation_table(&target)?;
            for statement in schema::recommendation_ddl(&relation) {
                sqlx::query(&statement).execute(&pool).await?;
            }
            tracing::debug!(target_table = %target, relation = %relation, "Recommendation relation ready");
            Ok(Self {
                pool,
                target,
                relation,
            })
        }
    }

    #[async_trait]
    impl RecommendableRepo for SqliteRecommendable {
        fn target(&self) -> &TableIdentifier {
            &self.target
        }

        async fn get_recs(&self, user_id: &str, count: u32) -> StoreResult<Vec<String>> {
            let sql = format!(
                "SELECT recommendation_id FROM {} WHERE user_id = ? ORDER BY RANDOM() LIMIT ?",
                self.relation
            );
            let ids: Vec<String> = sqlx::query_scalar(&sql)
                .bind(user_id)
                .bind(i64::from(count))
                .fetch_all(&self.pool)
                .await?;
            Ok(ids)
        }

        async fn get_random(&self, count: u32) -> StoreResult<Vec<String>> {
            let sql = format!(
                "SELECT CAST(id AS TEXT) FROM {} ORDER BY RANDOM() LIMIT ?",
                self.target
            );
            let ids: Vec<String> = sqlx::query_scalar(&sql)
                .bind(i64::from(count))
                .fetch_all(&self.pool)
                .await?;
            Ok(ids)
        }

        async fn set_recs(&self, user_id: &str, target_ids: &[String]) -> StoreResult<()> {
            let delete = format!("DELETE FROM {} WHERE user_id = ?", self.relation);
            let insert = format!(
                "INSERT INTO {} (recommendation_id, user_id) VALUES (?, ?)",
                self.relation
            );

            let mut tx = self.pool.begin().await?;
            sqlx::query(&delete)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

            let mut seen = HashSet::new();
            for target_id in target_ids {
                if !seen.insert(target_id.as_str()) {
                    continue;
                }
                sqlx::query(&insert)
                    .bind(target_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;

            tracing::debug!(
                relation = %self.relation,
                user_id = %user_id,
                count = seen.len(),
                "Replaced recommendations"
            );
            Ok(())
        }

        async fn recs_count(&self, user_id: &str) -> StoreResult<u64> {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = ?", self.relation);
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }
}
