//! Recommendation import files.
//!
//! One JSON object per line: `{"user_id": "7", "recommendations": ["42", "43"]}`.
//! Blank lines are skipped.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecsLine {
    pub user_id: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

pub fn parse_recs(input: &str) -> Result<Vec<RecsLine>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<RecsLine>(line)
                .with_context(|| format!("invalid recommendation record on line {}", idx + 1))
        })
        .collect()
}

pub async fn read_recs(path: &Path) -> Result<Vec<RecsLine>> {
    let input = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_recs(&input)
}
