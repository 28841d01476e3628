use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Post, PostChanges, PostPatch, PostView};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthorRepository, PostRepository};
use crate::services::RelationshipManager;
use crate::validation::{optional_text, parse_id, require_text};

/// Post CRUD. A post always references an existing author at write time.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    authors: Arc<dyn AuthorRepository>,
    relations: Arc<RelationshipManager>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        authors: Arc<dyn AuthorRepository>,
        relations: Arc<RelationshipManager>,
    ) -> Self {
        Self {
            posts,
            authors,
            relations,
        }
    }

    pub async fn create(&self, input: NewPost) -> Result<Post, DomainError> {
        let title = require_text("title", input.title)?;
        let body = require_text("body", input.body)?;
        let author_id = parse_id("Author", &require_text("author", input.author)?)?;

        if self.authors.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::invalid_reference("Author", author_id));
        }

        let post = self
            .posts
            .save(Post::new(title, body, author_id, input.image))
            .await?;

        // The author may vanish between the check and the attach.
        if let Err(e) = self.relations.attach_post_to_author(author_id, post.id).await {
            tracing::warn!(post_id = %post.id, %author_id, error = %e, "Rolling back post creation");
            if let Err(undo) = self.posts.delete(post.id).await {
                tracing::error!(post_id = %post.id, error = %undo, "Could not roll back post");
            }
            return Err(e);
        }

        tracing::debug!(post_id = %post.id, %author_id, "Post created");
        Ok(post)
    }

    /// Post with its author expanded; `None` when absent.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<PostView>, DomainError> {
        self.relations.expand_post_author(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<PostView>, DomainError> {
        self.relations.list_posts_with_authors().await
    }

    /// Merge the provided fields. Moving a post to another author requires
    /// that author to exist. The tags list is never written here.
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, DomainError> {
        let mut changes = PostChanges {
            title: optional_text("title", patch.title)?,
            body: optional_text("body", patch.body)?,
            author: None,
            image: patch.image.map(|image| (!image.is_empty()).then_some(image)),
        };
        let new_author = match patch.author {
            Some(raw) => Some(parse_id("Author", &raw)?),
            None => None,
        };

        let previous_author = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?
            .author;

        let Some(author_id) = new_author.filter(|author_id| *author_id != previous_author) else {
            return self
                .posts
                .update_fields(id, changes)
                .await?
                .ok_or_else(|| DomainError::not_found("Post", id));
        };

        // Attach first: a missing author fails here before anything is written.
        self.relations.attach_post_to_author(author_id, id).await?;
        changes.author = Some(author_id);

        let saved = match self.posts.update_fields(id, changes).await {
            Ok(Some(saved)) => saved,
            outcome => {
                if let Err(undo) = self.relations.detach_post_from_author(author_id, id).await {
                    tracing::error!(post_id = %id, %author_id, error = %undo, "Could not detach post after failed update");
                }
                return match outcome {
                    Err(e) => Err(e.into()),
                    Ok(_) => Err(DomainError::not_found("Post", id)),
                };
            }
        };

        if let Err(e) = self
            .relations
            .detach_post_from_author(previous_author, id)
            .await
        {
            // Expansion filters by `post.author`, so a stale entry is harmless.
            tracing::warn!(post_id = %id, author_id = %previous_author, error = %e, "Stale post id left on previous author");
        }

        tracing::debug!(post_id = %id, from = %previous_author, to = %author_id, "Post moved to new author");
        Ok(saved)
    }

    /// Remove the post. Tags and the author keep the stale post id.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        match self.posts.delete(id).await {
            Ok(()) | Err(RepoError::NotFound) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
