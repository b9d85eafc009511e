//! Shadow-table names and DDL for capability relations.
//!
//! Every table and index name produced here is built from a validated
//! [`TableIdentifier`]; derived names go through validation again.

use crate::error::StoreResult;
use agora_core::TableIdentifier;

/// Relation table holding likes for `target`: `Likeable<Target>`.
pub fn likeable_table(target: &TableIdentifier) -> StoreResult<TableIdentifier> {
    Ok(target.derive("Likeable", "")?)
}

/// Relation table holding recommendations for `target`: `<Target>Recommendation`.
pub fn recommendation_table(target: &TableIdentifier) -> StoreResult<TableIdentifier> {
    Ok(target.derive("", "Recommendation")?)
}

/// DDL for a like relation table and its (target_id, liker_id) index.
pub fn likeable_ddl(relation: &TableIdentifier) -> [String; 2] {
    [
        format!(
            "CREATE TABLE IF NOT EXISTS {relation} (
                target_id TEXT NOT NULL,
                liker_id TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{relation}_target_liker ON {relation}(target_id, liker_id)"
        ),
    ]
}

/// DDL for a recommendation relation table and its user_id index.
pub fn recommendation_ddl(relation: &TableIdentifier) -> [String; 2] {
    [
        format!(
            "CREATE TABLE IF NOT EXISTS {relation} (
                recommendation_id TEXT NOT NULL,
                user_id TEXT NOT NULL
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{relation}_user ON {relation}(user_id)"),
    ]
}
