//! Recommendation pages with random backfill.

use crate::error::{ServiceError, ServiceResult};
use agora_core::TableIdentifier;
use agora_store::RecommendableRepo;
use std::sync::Arc;

#[derive(Clone)]
pub struct RecommendableService {
    repo: Arc<dyn RecommendableRepo>,
}

impl RecommendableService {
    pub fn new(repo: Arc<dyn RecommendableRepo>) -> Self {
        Self { repo }
    }

    pub fn target(&self) -> &TableIdentifier {
        self.repo.target()
    }

    /// A page of up to `count` target ids for `user_id`.
    ///
    /// Stored recommendations come first. When there are fewer than `count`
    /// of them, the rest of the page is filled with ids sampled from the whole
    /// target table. Filler is not deduplicated against the stored ids. If the
    /// table itself is too small the page is short; that is not an error.
    /// A store failure in either step fails the whole call.
    pub async fn recommend(&self, user_id: &str, count: u32) -> ServiceResult<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let wanted = count as usize;
        let mut page = self.repo.get_recs(user_id, count).await?;
        if page.len() >= wanted {
            page.truncate(wanted);
            return Ok(page);
        }

        let stored = page.len();
        let missing = count - stored as u32;
        let filler = self.repo.get_random(missing).await?;
        page.extend(filler);

        tracing::debug!(
            target_table = %self.repo.target(),
            user_id = %user_id,
            requested = count,
            stored,
            backfilled = page.len() - stored,
            "Built recommendation page"
        );
        Ok(page)
    }

    /// Replace the stored recommendations for a user.
    pub async fn set_recs(&self, user_id: &str, target_ids: &[String]) -> ServiceResult<()> {
        let target = self.repo.target();
        self.repo
            .set_recs(user_id, target_ids)
            .await
            .map_err(ServiceError::internal(format!(
                "storing {target} recommendations for user {user_id}"
            )))
    }

    /// Number of stored recommendations for a user.
    pub async fn recs_count(&self, user_id: &str) -> ServiceResult<u64> {
        Ok(self.repo.recs_count(user_id).await?)
    }
}
