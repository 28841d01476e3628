use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Author, AuthorChanges, Post, PostChanges, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Fetch every entity in the collection.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Fetch the entities matching `ids`. Unknown ids are skipped and the
    /// result order is unspecified.
    async fn find_many(&self, ids: &[ID]) -> Result<Vec<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Outcome of a single-document reference list update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// The list was modified and persisted.
    Changed,
    /// The document exists but the list already had the requested shape.
    Unchanged,
    /// No document with that id.
    Missing,
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {
    /// Add `post_id` to the author's posts list (set semantics).
    async fn add_post(&self, author_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError>;

    async fn remove_post(&self, author_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError>;

    /// Write scalar fields only, leaving `posts` as stored. `None` when no
    /// author has this id.
    async fn update_fields(
        &self,
        author_id: Uuid,
        changes: AuthorChanges,
    ) -> Result<Option<Author>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Add `tag_id` to the post's tags list (set semantics).
    async fn add_tag(&self, post_id: Uuid, tag_id: Uuid) -> Result<ListChange, RepoError>;

    async fn remove_tag(&self, post_id: Uuid, tag_id: Uuid) -> Result<ListChange, RepoError>;

    /// Write scalar fields only, leaving `tags` as stored.
    async fn update_fields(
        &self,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    /// Add `post_id` to the tag's posts list (set semantics).
    async fn add_post(&self, tag_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError>;

    async fn remove_post(&self, tag_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError>;
}
