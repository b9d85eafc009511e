//! Precomputed recommendation repository (`<Target>Recommendation`).

use crate::error::StoreResult;
use agora_core::TableIdentifier;
use async_trait::async_trait;

/// Repository for (user, recommended target) pairs.
///
/// Reads sample in random order on every call; there is no stable ranking.
#[async_trait]
pub trait RecommendableRepo: Send + Sync {
    fn target(&self) -> &TableIdentifier;

    /// Up to `count` stored recommendations for a user, randomly ordered.
    async fn get_recs(&self, user_id: &str, count: u32) -> StoreResult<Vec<String>>;

    /// Up to `count` target ids sampled from the whole target table.
    async fn get_random(&self, count: u32) -> StoreResult<Vec<String>>;

    /// Replace a user's recommendation set.
    ///
    /// Runs in a single transaction; duplicate ids are stored once.
    async fn set_recs(&self, user_id: &str, target_ids: &[String]) -> StoreResult<()>;

    /// Number of stored recommendations for a user.
    async fn recs_count(&self, user_id: &str) -> StoreResult<u64>;
}
