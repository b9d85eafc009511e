//! Like toggling and like statistics.

use crate::error::ServiceResult;
use crate::traits::{LikeChecker, LikeToggler};
use agora_core::TableIdentifier;
use agora_store::LikeableRepo;
use async_trait::async_trait;
use std::sync::Arc;

/// Like capability service for one target table.
///
/// No permission logic lives here; see [`crate::SafeLikeService`] for the
/// self-like guard. Store errors are returned unchanged.
#[derive(Clone)]
pub struct LikeableService {
    repo: Arc<dyn LikeableRepo>,
}

impl LikeableService {
    pub fn new(repo: Arc<dyn LikeableRepo>) -> Self {
        Self { repo }
    }

    pub fn target(&self) -> &TableIdentifier {
        self.repo.target()
    }

    /// Like the target if the user does not like it yet, otherwise unlike it.
    ///
    /// Returns whether the target is liked afterwards. This is a read followed
    /// by a write with no transaction around it: two concurrent toggles for the
    /// same pair may both insert or both delete.
    pub async fn toggle_like(&self, target_id: &str, user_id: &str) -> ServiceResult<bool> {
        let liked = if self.repo.is_liked(target_id, user_id).await? {
            self.repo.unlike(target_id, user_id).await?;
            false
        } else {
            self.repo.like(target_id, user_id).await?;
            true
        };
        tracing::debug!(
            target_table = %self.repo.target(),
            target_id = %target_id,
            user_id = %user_id,
            liked,
            "Toggled like"
        );
        Ok(liked)
    }

    pub async fn is_liked(&self, target_id: &str, user_id: &str) -> ServiceResult<bool> {
        Ok(self.repo.is_liked(target_id, user_id).await?)
    }

    pub async fn likes_count(&self, target_id: &str) -> ServiceResult<u64> {
        Ok(self.repo.likes_count(target_id).await?)
    }

    pub async fn user_likes_count(&self, user_id: &str) -> ServiceResult<u64> {
        Ok(self.repo.user_likes_count(user_id).await?)
    }

    /// Ids the user likes, in no particular order.
    pub async fn user_likes(&self, user_id: &str) -> ServiceResult<Vec<String>> {
        Ok(self.repo.user_likes(user_id).await?)
    }
}

#[async_trait]
impl LikeChecker for LikeableService {
    async fn is_liked(&self, target_id: &str, user_id: &str) -> ServiceResult<bool> {
        LikeableService::is_liked(self, target_id, user_id).await
    }
}

#[async_trait]
impl LikeToggler for LikeableService {
    async fn toggle_like(&self, target_id: &str, user_id: &str) -> ServiceResult<bool> {
        LikeableService::toggle_like(self, target_id, user_id).await
    }
}
