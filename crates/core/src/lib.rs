//! Core domain types shared by the agora capability crates.
//!
//! This crate defines:
//! - Validated SQL table identifiers
//! - Caller-relative context values and the author profile shape
//! - Application configuration

pub mod config;
pub mod context;
pub mod error;
pub mod identifier;

pub use context::{OwnLikeContext, Profile};
pub use error::{Error, Result};
pub use identifier::TableIdentifier;
