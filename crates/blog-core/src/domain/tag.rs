use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - one side of the tag/post many-to-many link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
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

    pub fn add_post(&mut self, post_id: Uuid) -> bool {
        let changed = super::insert_unique(&mut self.posts, post_id);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    pub fn remove_post(&mut self, post_id: Uuid) -> bool {
        let changed = super::remove_all(&mut self.posts, post_id);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}
