//! Caller-relative values attached to entities before they are returned.

use serde::{Deserialize, Serialize};

/// Public author profile, as handed out by the profile resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User id of the profile owner.
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Public URL of the avatar image, if one was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Whether the caller likes and/or owns an entity.
///
/// Derived on every read and never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnLikeContext {
    pub is_liked: bool,
    pub is_mine: bool,
}

impl OwnLikeContext {
    /// Build the context for `caller` given the resolved owner id.
    pub fn resolve(caller_id: &str, owner_id: &str, is_liked: bool) -> Self {
        Self {
            is_liked,
            is_mine: caller_id == owner_id,
        }
    }
}
