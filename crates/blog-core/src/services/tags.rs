use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewTag, Tag, TagView};
use crate::error::{DomainError, RepoError};
use crate::ports::TagRepository;
use crate::services::RelationshipManager;
use crate::validation::require_text;

/// Tag CRUD and tag/post linking.
#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
    relations: Arc<RelationshipManager>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>, relations: Arc<RelationshipManager>) -> Self {
        Self { tags, relations }
    }

    pub async fn create(&self, input: NewTag) -> Result<Tag, DomainError> {
        let name = require_text("name", input.name)?;
        Ok(self.tags.save(Tag::new(name)).await?)
    }

    /// Tag with its posts expanded; `None` when absent.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<TagView>, DomainError> {
        self.relations.expand_tag_posts(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.find_all().await?)
    }

    /// Remove the tag. Linked posts keep the stale tag id.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        match self.tags.delete(id).await {
            Ok(()) | Err(RepoError::NotFound) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn add_tag_to_post(&self, post_id: Uuid, tag_id: Uuid) -> Result<(), DomainError> {
        self.relations.link_tag_to_post(tag_id, post_id).await
    }

    pub async fn remove_tag_from_post(
        &self,
        post_id: Uuid,
        tag_id: Uuid,
    ) -> Result<(), DomainError> {
        self.relations.unlink_tag_from_post(tag_id, post_id).await
    }
}
