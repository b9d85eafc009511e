//! Test fixtures.

use agora_core::{Profile, TableIdentifier};
use agora_service::Authored;
use serde::Serialize;

#[allow(dead_code)]
pub fn table(name: &str) -> TableIdentifier {
    TableIdentifier::new(name).unwrap()
}

#[allow(dead_code)]
pub fn profile(user_id: &str) -> Profile {
    Profile {
        id: user_id.to_string(),
        username: format!("user{user_id}"),
        display_name: None,
        avatar_url: None,
    }
}

/// Minimal post row for context tests.
#[derive(Clone, Debug, Serialize)]
pub struct PostRow {
    pub id: String,
    pub owner_id: String,
    pub body: String,
}

#[allow(dead_code)]
impl PostRow {
    pub fn new(id: &str, owner_id: &str) -> Self {
        Self {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            body: format!("post {id}"),
        }
    }
}

impl Authored for PostRow {
    fn id(&self) -> &str {
        &self.id
    }

    fn author_id(&self) -> &str {
        &self.owner_id
    }
}
