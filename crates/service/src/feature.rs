//! Wiring every capability onto a feature's target table.

use crate::context::ContextAdder;
use crate::deletable::DeletableService;
use crate::error::ServiceResult;
use crate::likeable::LikeableService;
use crate::ownable::OwnableService;
use crate::recommendable::RecommendableService;
use crate::safe_like::SafeLikeService;
use crate::traits::ProfileResolver;
use agora_core::TableIdentifier;
use agora_core::config::TargetsConfig;
use agora_store::CapabilityStore;
use std::fmt;
use std::sync::Arc;

/// All capability services attached to one target table.
#[derive(Clone)]
pub struct Feature {
    target: TableIdentifier,
    pub likes: Arc<LikeableService>,
    pub owners: Arc<OwnableService>,
    pub deleter: DeletableService,
    pub safe_likes: SafeLikeService,
    pub recommendations: RecommendableService,
}

impl Feature {
    /// Attach every capability to `target`, creating relation tables as needed.
    pub async fn attach(store: &dyn CapabilityStore, target: TableIdentifier) -> ServiceResult<Self> {
        let likes = Arc::new(LikeableService::new(store.likeable(&target).await?));
        let owners = Arc::new(OwnableService::new(store.ownable(&target).await?));
        let deleter = DeletableService::new(store.deletable(&target).await?, owners.clone());
        let safe_likes = SafeLikeService::new(owners.clone(), likes.clone());
        let recommendations = RecommendableService::new(store.recommendable(&target).await?);

        tracing::info!(
            backend = store.backend_name(),
            target_table = %target,
            "Attached capabilities"
        );

        Ok(Self {
            target,
            likes,
            owners,
            deleter,
            safe_likes,
            recommendations,
        })
    }

    pub fn target(&self) -> &TableIdentifier {
        &self.target
    }

    /// Context adder for this feature's entities.
    pub fn context_adder(&self, profiles: Arc<dyn ProfileResolver>) -> ContextAdder {
        ContextAdder::new(profiles, self.likes.clone())
    }
}

/// The standard features of the social network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    Posts,
    Comments,
    Profiles,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FeatureKind::Posts => "posts",
            FeatureKind::Comments => "comments",
            FeatureKind::Profiles => "profiles",
        })
    }
}

/// Posts, comments and profiles, each with its own capability tables.
#[derive(Clone)]
pub struct Features {
    pub posts: Feature,
    pub comments: Feature,
    pub profiles: Feature,
}

impl Features {
    pub async fn attach(store: &dyn CapabilityStore, targets: &TargetsConfig) -> ServiceResult<Self> {
        Ok(Self {
            posts: Feature::attach(store, targets.posts.clone()).await?,
            comments: Feature::attach(store, targets.comments.clone()).await?,
            profiles: Feature::attach(store, targets.profiles.clone()).await?,
        })
    }

    pub fn get(&self, kind: FeatureKind) -> &Feature {
        match kind {
            FeatureKind::Posts => &self.posts,
            FeatureKind::Comments => &self.comments,
            FeatureKind::Profiles => &self.profiles,
        }
    }
}
