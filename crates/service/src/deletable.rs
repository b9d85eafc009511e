//! Owner-checked deletes.

use crate::error::{ServiceError, ServiceResult};
use crate::traits::OwnerGetter;
use agora_core::TableIdentifier;
use agora_store::DeletableRepo;
use std::sync::Arc;

/// Deletes targets on behalf of their owner.
///
/// Ownership comes from an injected [`OwnerGetter`]; this service never
/// reads the owner column itself.
#[derive(Clone)]
pub struct DeletableService {
    repo: Arc<dyn DeletableRepo>,
    owners: Arc<dyn OwnerGetter>,
}

impl DeletableService {
    pub fn new(repo: Arc<dyn DeletableRepo>, owners: Arc<dyn OwnerGetter>) -> Self {
        Self { repo, owners }
    }

    pub fn target(&self) -> &TableIdentifier {
        self.repo.target()
    }

    /// Delete `target_id` if `caller_id` owns it.
    ///
    /// The owner check happens before any write; a non-owner gets
    /// `InsufficientPermissions` and the row is left untouched.
    pub async fn delete(&self, target_id: &str, caller_id: &str) -> ServiceResult<()> {
        let target = self.repo.target();
        let owner = self.owners.get_owner(target_id).await?;
        if owner != caller_id {
            tracing::warn!(
                target_table = %target,
                target_id = %target_id,
                caller_id = %caller_id,
                "Rejected delete by non-owner"
            );
            return Err(ServiceError::InsufficientPermissions(format!(
                "only the owner can delete {target} {target_id}"
            )));
        }

        self.repo.delete(target_id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("{target} {target_id}"))
            } else {
                ServiceError::internal(format!("deleting {target} {target_id}"))(e)
            }
        })?;
        tracing::info!(target_table = %target, target_id = %target_id, "Deleted target");
        Ok(())
    }
}
