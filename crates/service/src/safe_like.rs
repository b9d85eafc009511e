//! Like toggling guarded against liking one's own content.

use crate::error::{ServiceError, ServiceResult};
use crate::traits::{LikeToggler, OwnerGetter};
use async_trait::async_trait;
use std::sync::Arc;

/// Ownable + Likeable composite.
#[derive(Clone)]
pub struct SafeLikeService {
    owners: Arc<dyn OwnerGetter>,
    toggler: Arc<dyn LikeToggler>,
}

impl SafeLikeService {
    pub fn new(owners: Arc<dyn OwnerGetter>, toggler: Arc<dyn LikeToggler>) -> Self {
        Self { owners, toggler }
    }

    /// Toggle the caller's like unless the caller owns the target.
    ///
    /// The owner is resolved first, so a missing target fails with `NotFound`
    /// and a self-like fails with `LikingYourself`, both before any like write.
    pub async fn safe_toggle_like(&self, target_id: &str, caller_id: &str) -> ServiceResult<bool> {
        let owner = self.owners.get_owner(target_id).await?;
        if owner == caller_id {
            tracing::debug!(target_id = %target_id, caller_id = %caller_id, "Rejected self-like");
            return Err(ServiceError::LikingYourself);
        }
        self.toggler.toggle_like(target_id, caller_id).await
    }
}

#[async_trait]
impl LikeToggler for SafeLikeService {
    async fn toggle_like(&self, target_id: &str, user_id: &str) -> ServiceResult<bool> {
        self.safe_toggle_like(target_id, user_id).await
    }
}
