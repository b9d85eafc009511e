//! Like relation repository (`Likeable<Target>`).

use crate::error::StoreResult;
use agora_core::TableIdentifier;
use async_trait::async_trait;

/// Repository for (target, liker) pairs.
///
/// `like` does not guard against duplicates; callers check `is_liked` first.
#[async_trait]
pub trait LikeableRepo: Send + Sync {
    /// The target table this repository is attached to.
    fn target(&self) -> &TableIdentifier;

    /// Check whether `user_id` likes `target_id`.
    async fn is_liked(&self, target_id: &str, user_id: &str) -> StoreResult<bool>;

    /// Record a like.
    async fn like(&self, target_id: &str, user_id: &str) -> StoreResult<()>;

    /// Remove every like row for the pair.
    async fn unlike(&self, target_id: &str, user_id: &str) -> StoreResult<()>;

    /// Number of likes on a target.
    async fn likes_count(&self, target_id: &str) -> StoreResult<u64>;

    /// Number of targets a user likes.
    async fn user_likes_count(&self, user_id: &str) -> StoreResult<u64>;

    /// Ids of targets a user likes, in no particular order.
    async fn user_likes(&self, user_id: &str) -> StoreResult<Vec<String>>;
}
