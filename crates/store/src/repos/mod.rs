//! Repository traits, one per capability.
//!
//! Every repository is bound to a single target table at construction time.

pub mod deletable;
pub mod likeable;
pub mod ownable;
pub mod recommendable;

pub use deletable::DeletableRepo;
pub use likeable::LikeableRepo;
pub use ownable::OwnableRepo;
pub use recommendable::RecommendableRepo;
