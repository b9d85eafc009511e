//! Capability services for agora.
//!
//! Business rules layered over the capability stores: idempotent like
//! toggles, owner checks before deletes and self-likes, recommendation
//! backfill, and caller-relative context for response entities. Services
//! depend on each other only through the operation traits in [`traits`].

pub mod context;
pub mod deletable;
pub mod error;
pub mod feature;
pub mod likeable;
pub mod ownable;
pub mod recommendable;
pub mod safe_like;
pub mod traits;

pub use context::{Authored, ContextAdder, Contextual};
pub use deletable::DeletableService;
pub use error::{ServiceError, ServiceResult};
pub use feature::{Feature, FeatureKind, Features};
pub use likeable::LikeableService;
pub use ownable::OwnableService;
pub use recommendable::RecommendableService;
pub use safe_like::SafeLikeService;
pub use traits::{LikeChecker, LikeToggler, OwnerGetter, ProfileResolver};
