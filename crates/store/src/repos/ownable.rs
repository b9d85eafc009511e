//! Ownership lookups against the target table's `owner_id` column.

use crate::error::StoreResult;
use agora_core::TableIdentifier;
use async_trait::async_trait;

/// Read-only owner lookup. Ownership is written by the feature that creates the row.
#[async_trait]
pub trait OwnableRepo: Send + Sync {
    fn target(&self) -> &TableIdentifier;

    /// Owner user id of a target.
    ///
    /// Returns `StoreError::NotFound` when no row has the id.
    async fn get_owner(&self, target_id: &str) -> StoreResult<String>;
}
