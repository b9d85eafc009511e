//! Row deletion on the target table.

use crate::error::StoreResult;
use agora_core::TableIdentifier;
use async_trait::async_trait;

#[async_trait]
pub trait DeletableRepo: Send + Sync {
    fn target(&self) -> &TableIdentifier;

    /// Delete a target row by id.
    ///
    /// Returns `StoreError::NotFound` when nothing was deleted.
    async fn delete(&self, target_id: &str) -> StoreResult<()>;
}
