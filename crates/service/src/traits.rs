//! Operation traits services use to reach each other.
//!
//! A service that needs another capability holds only the operation it
//! calls (`Arc<dyn OwnerGetter>`), not the sibling service.

use crate::error::ServiceResult;
use agora_core::Profile;
use async_trait::async_trait;

/// Answers "does this user like this target".
#[async_trait]
pub trait LikeChecker: Send + Sync {
    async fn is_liked(&self, target_id: &str, user_id: &str) -> ServiceResult<bool>;
}

/// Flips a user's like on a target and reports the resulting state.
#[async_trait]
pub trait LikeToggler: Send + Sync {
    async fn toggle_like(&self, target_id: &str, user_id: &str) -> ServiceResult<bool>;
}

/// Resolves the owner user id of a target.
///
/// Implementations return `ServiceError::NotFound` for missing targets.
#[async_trait]
pub trait OwnerGetter: Send + Sync {
    async fn get_owner(&self, target_id: &str) -> ServiceResult<String>;
}

/// Looks up a user's public profile as seen by the caller.
///
/// Provided by the profiles feature; a missing profile is `ServiceError::NotFound`.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    async fn resolve(&self, user_id: &str, caller_id: &str) -> ServiceResult<Profile>;
}
