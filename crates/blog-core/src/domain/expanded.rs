//! Read-time views with one hop of reference expansion.
//!
//! A reference that no longer resolves becomes `None` (single reference)
//! or is left out (reference lists). Expansion never fails because of a
//! dangling id.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Author, Post, Tag};

/// Projection of an author embedded in a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: author.name.clone(),
        }
    }
}

/// Post with its author expanded to `{id, name}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: Option<AuthorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub tags: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, author: Option<AuthorSummary>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            author,
            image: post.image,
            tags: post.tags,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Author with its posts expanded to full documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: Uuid,
    pub name: String,
    pub posts: Vec<Post>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthorView {
    pub fn new(author: Author, posts: Vec<Post>) -> Self {
        Self {
            id: author.id,
            name: author.name,
            posts,
            created_at: author.created_at,
            updated_at: author.updated_at,
        }
    }
}

/// Tag with its posts expanded to full documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagView {
    pub id: Uuid,
    pub name: String,
    pub posts: Vec<Post>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TagView {
    pub fn new(tag: Tag, posts: Vec<Post>) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            posts,
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}
