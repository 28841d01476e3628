use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorChanges;

/// Author entity - owns a back-reference list of its posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    /// Create a new author with no posts.
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record `post_id` in the back-reference list.
    pub fn add_post(&mut self, post_id: Uuid) -> bool {
        let changed = super::insert_unique(&mut self.posts, post_id);
        if changed {
            self.touch();
        }
        changed
    }

    pub fn remove_post(&mut self, post_id: Uuid) -> bool {
        let changed = super::remove_all(&mut self.posts, post_id);
        if changed {
            self.touch();
        }
        changed
    }

    /// Apply scalar changes; the posts list is left as is.
    pub fn apply(&mut self, changes: AuthorChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
