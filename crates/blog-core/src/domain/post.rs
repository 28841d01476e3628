use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PostChanges;

/// Post entity - belongs to exactly one author, carries its tag references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: Uuid,
    /// Opaque path of an uploaded asset. Never inspected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub tags: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new untagged post.
    pub fn new(title: String, body: String, author: Uuid, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            body,
            author,
            image,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply scalar changes; the tags list is left as is.
    pub fn apply(&mut self, changes: PostChanges) {
        let PostChanges {
            title,
            body,
            author,
            image,
        } = changes;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(body) = body {
            self.body = body;
        }
        if let Some(author) = author {
            self.author = author;
        }
        if let Some(image) = image {
            self.image = image;
        }
        self.updated_at = Utc::now();
    }

    pub fn add_tag(&mut self, tag_id: Uuid) -> bool {
        let changed = super::insert_unique(&mut self.tags, tag_id);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    pub fn remove_tag(&mut self, tag_id: Uuid) -> bool {
        let changed = super::remove_all(&mut self.tags, tag_id);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}
