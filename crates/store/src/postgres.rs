//! PostgreSQL-based capability store implementation.

use crate::error::{StoreError, StoreResult};
use crate::repos::{DeletableRepo, LikeableRepo, OwnableRepo, RecommendableRepo};
use crate::schema;
use crate::store::CapabilityStore;
use agora_core::TableIdentifier;
use agora_core::config::PgSslMode;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

/// PostgreSQL-based capability store.
///
/// Relation table names are spliced in unquoted, so PostgreSQL folds them to
/// lower case; every statement uses the same folding.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        tracing::info!("Connecting to PostgreSQL using connection URL");
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    #[allow(clippy::too_many_arguments)]
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        if let Some(mode) = ssl_mode {
            let sqlx_mode = match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            };
            opts = opts.ssl_mode(sqlx_mode);
        }

        // Log connection info without password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL with individual parameters"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{}ms", timeout_ms))]);
            tracing::info!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl CapabilityStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn likeable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn LikeableRepo>> {
        let repo = PgLikeable::attach(self.pool.clone(), target.clone()).await?;
        Ok(Arc::new(repo))
    }

    async fn ownable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn OwnableRepo>> {
        Ok(Arc::new(PgOwnable {
            pool: self.pool.clone(),
            target: target.clone(),
        }))
    }

    async fn deletable(&self, target: &TableIdentifier) -> StoreResult<Arc<dyn DeletableRepo>> {
        Ok(Arc::new(PgDeletable {
            pool: self.pool.clone(),
            target: target.clone(),
        }))
    }

    async fn recommendable(
        &self,
        target: &TableIdentifier,
    ) -> StoreResult<Arc<dyn RecommendableRepo>> {
        let repo = PgRecommendable::attach(self.pool.clone(), target.clone()).await?;
        Ok(Arc::new(repo))
    }
}

struct PgLikeable {
    pool: Pool<Postgres>,
    target: TableIdentifier,
    relation: TableIdentifier,
}

impl PgLikeable {
    async fn attach(pool: Pool<Postgres>, target: TableIdentifier) -> StoreResult<Self> {
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
impl LikeableRepo for PgLikeable {
    fn target(&self) -> &TableIdentifier {
        &self.target
    }

    async fn is_liked(&self, target_id: &str, user_id: &str) -> StoreResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE target_id = $1 AND liker_id = $2)",
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
            "INSERT INTO {} (target_id, liker_id) VALUES ($1, $2)",
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
            "DELETE FROM {} WHERE target_id = $1 AND liker_id = $2",
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
        let sql = format!("SELECT COUNT(*) FROM {} WHERE target_id = $1", self.relation);
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(target_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn user_likes_count(&self, user_id: &str) -> StoreResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE liker_id = $1", self.relation);
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn user_likes(&self, user_id: &str) -> StoreResult<Vec<String>> {
        let sql = format!("SELECT target_id FROM {} WHERE liker_id = $1", self.relation);
        let ids: Vec<String> = sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}

struct PgOwnable {
    pool: Pool<Postgres>,
    target: TableIdentifier,
}

#[async_trait]
impl OwnableRepo for PgOwnable {
    fn target(&self) -> &TableIdentifier {
        &self.target
    }

    async fn get_owner(&self, target_id: &str) -> StoreResult<String> {
        let sql = format!(
            "SELECT CAST(owner_id AS TEXT) FROM {} WHERE id = $1",
            self.target
        );
        let owner: Option<String> = sqlx::query_scalar(&sql)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await?;
        owner.ok_or_else(|| StoreError::NotFound(format!("{} {target_id}", self.target)))
    }
}

struct PgDeletable {
    pool: Pool<Postgres>,
    target: TableIdentifier,
}

#[async_trait]
impl DeletableRepo for PgDeletable {
    fn target(&self) -> &TableIdentifier {
        &self.target
    }

    async fn delete(&self, target_id: &str) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.target);
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

struct PgRecommendable {
    pool: Pool<Postgres>,
    target: TableIdentifier,
    relation: TableIdentifier,
}

impl PgRecommendable {
    async fn attach(pool: Pool<Postgres>, target: TableIdentifier) -> StoreResult<Self> {
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
impl RecommendableRepo for PgRecommendable {
    fn target(&self) -> &TableIdentifier {
        &self.target
    }

    async fn get_recs(&self, user_id: &str, count: u32) -> StoreResult<Vec<String>> {
        let sql = format!(
            "SELECT recommendation_id FROM {} WHERE user_id = $1 ORDER BY RANDOM() LIMIT $2",
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
            "SELECT CAST(id AS TEXT) FROM {} ORDER BY RANDOM() LIMIT $1",
            self.target
        );
        let ids: Vec<String> = sqlx::query_scalar(&sql)
            .bind(i64::from(count))
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn set_recs(&self, user_id: &str, target_ids: &[String]) -> StoreResult<()> {
        let delete = format!("DELETE FROM {} WHERE user_id = $1", self.relation);
        let insert = format!(
            "INSERT INTO {} (recommendation_id, user_id) VALUES ($1, $2)",
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
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", self.relation);
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
