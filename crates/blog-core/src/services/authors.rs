use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Author, AuthorChanges, AuthorPatch, AuthorView, NewAuthor};
use crate::error::{DomainError, RepoError};
use crate::ports::AuthorRepository;
use crate::services::RelationshipManager;
use crate::validation::{optional_text, require_text};

/// Author CRUD.
#[derive(Clone)]
pub struct AuthorService {
    authors: Arc<dyn AuthorRepository>,
    relations: Arc<RelationshipManager>,
}

impl AuthorService {
    pub fn new(authors: Arc<dyn AuthorRepository>, relations: Arc<RelationshipManager>) -> Self {
        Self { authors, relations }
    }

    pub async fn create(&self, input: NewAuthor) -> Result<Author, DomainError> {
        let name = require_text("name", input.name)?;
        let author = self.authors.save(Author::new(name)).await?;
        tracing::debug!(author_id = %author.id, "Author created");
        Ok(author)
    }

    /// Author with its posts expanded; `None` when no author has this id.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<AuthorView>, DomainError> {
        self.relations.expand_author_posts(id).await
    }

    /// All authors with their posts expanded.
    pub async fn get_all(&self) -> Result<Vec<AuthorView>, DomainError> {
        self.relations.list_authors_with_posts().await
    }

    pub async fn update(&self, id: Uuid, patch: AuthorPatch) -> Result<Author, DomainError> {
        let changes = AuthorChanges {
            name: optional_text("name", patch.name)?,
        };

        self.authors
            .update_fields(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Author", id))
    }

    /// Remove the author. Posts keep their (now dangling) author id.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        match self.authors.delete(id).await {
            Ok(()) => {
                tracing::debug!(author_id = %id, "Author deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => {
                tracing::debug!(author_id = %id, "Delete of unknown author ignored");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
