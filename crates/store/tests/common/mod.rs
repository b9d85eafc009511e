//! Common test utilities for capability store tests.

pub mod stores;

#[allow(unused_imports)]
pub use stores::*;
