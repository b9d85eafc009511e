//! Decorating entities with caller-relative state.

use crate::error::ServiceResult;
use crate::traits::{LikeChecker, ProfileResolver};
use agora_core::{OwnLikeContext, Profile};
use serde::Serialize;
use std::sync::Arc;

/// An entity with an id and an author.
pub trait Authored {
    fn id(&self) -> &str;
    fn author_id(&self) -> &str;
}

/// An entity ready to be returned to a caller.
///
/// Serializes as the entity's own fields plus `author`, `is_liked` and `is_mine`.
#[derive(Clone, Debug, Serialize)]
pub struct Contextual<E> {
    #[serde(flatten)]
    pub entity: E,
    pub author: Profile,
    #[serde(flatten)]
    pub context: OwnLikeContext,
}

/// Resolves author profiles and [`OwnLikeContext`] for one feature's entities.
#[derive(Clone)]
pub struct ContextAdder {
    profiles: Arc<dyn ProfileResolver>,
    likes: Arc<dyn LikeChecker>,
}

impl ContextAdder {
    pub fn new(profiles: Arc<dyn ProfileResolver>, likes: Arc<dyn LikeChecker>) -> Self {
        Self { profiles, likes }
    }

    /// Resolve the author, then whether the caller likes and owns `entity`.
    pub async fn add_context<E: Authored>(
        &self,
        entity: E,
        caller_id: &str,
    ) -> ServiceResult<Contextual<E>> {
        let author = self.profiles.resolve(entity.author_id(), caller_id).await?;
        let is_liked = self.likes.is_liked(entity.id(), caller_id).await?;
        let context = OwnLikeContext::resolve(caller_id, &author.id, is_liked);
        Ok(Contextual {
            entity,
            author,
            context,
        })
    }

    /// Decorate every entity in order, failing on the first error.
    pub async fn add_context_all<E: Authored>(
        &self,
        entities: Vec<E>,
        caller_id: &str,
    ) -> ServiceResult<Vec<Contextual<E>>> {
        let mut decorated = Vec::with_capacity(entities.len());
        for entity in entities {
            decorated.push(self.add_context(entity, caller_id).await?);
        }
        Ok(decorated)
    }
}
