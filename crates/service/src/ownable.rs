//! Owner lookups with client-facing not-found errors.

use crate::error::{ServiceError, ServiceResult};
use crate::traits::OwnerGetter;
use agora_core::TableIdentifier;
use agora_store::OwnableRepo;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone)]
pub struct OwnableService {
    repo: Arc<dyn OwnableRepo>,
}

impl OwnableService {
    pub fn new(repo: Arc<dyn OwnableRepo>) -> Self {
        Self { repo }
    }

    pub fn target(&self) -> &TableIdentifier {
        self.repo.target()
    }

    /// Owner user id of a target.
    ///
    /// A missing target is `ServiceError::NotFound`; any other store failure
    /// is wrapped as `ServiceError::Internal`.
    pub async fn get_owner(&self, target_id: &str) -> ServiceResult<String> {
        let target = self.repo.target();
        self.repo.get_owner(target_id).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("{target} {target_id}"))
            } else {
                ServiceError::internal(format!("getting owner of {target} {target_id}"))(e)
            }
        })
    }
}

#[async_trait]
impl OwnerGetter for OwnableService {
    async fn get_owner(&self, target_id: &str) -> ServiceResult<String> {
        OwnableService::get_owner(self, target_id).await
    }
}
