//! Relationship manager - keeps reference lists between authors, posts and
//! tags consistent and performs read-time expansion.
//!
//! The tag/post link is stored twice (`tag.posts` and `post.tags`). When the
//! store offers a [`ReciprocalLinker`] both sides are written in one
//! transaction. Otherwise the two writes run sequentially, tag side first,
//! and a failed post-side write is compensated on the tag side.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorSummary, AuthorView, Post, PostView, TagView};
use crate::error::DomainError;
use crate::ports::{
    AuthorRepository, LinkOutcome, LinkSide, ListChange, PostRepository, ReciprocalLinker,
    TagRepository,
};

pub struct RelationshipManager {
    authors: Arc<dyn AuthorRepository>,
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    linker: Option<Arc<dyn ReciprocalLinker>>,
}

/// Direction of a tag/post list update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Link,
    Unlink,
}

impl RelationshipManager {
    pub fn new(
        authors: Arc<dyn AuthorRepository>,
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            authors,
            posts,
            tags,
            linker: None,
        }
    }

    /// Route tag/post link writes through a store transaction.
    pub fn with_linker(mut self, linker: Arc<dyn ReciprocalLinker>) -> Self {
        self.linker = Some(linker);
        self
    }

    pub fn is_transactional(&self) -> bool {
        self.linker.is_some()
    }

    /// Make `tag.posts` contain `post_id` and `post.tags` contain `tag_id`.
    ///
    /// Idempotent. Fails with `NotFound` when either document is missing.
    pub async fn link_tag_to_post(&self, tag_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        tracing::debug!(%tag_id, %post_id, "Linking tag to post");
        self.apply(Direction::Link, tag_id, post_id).await
    }

    /// Remove the reciprocal entries of a tag/post pair. Idempotent.
    pub async fn unlink_tag_from_post(
        &self,
        tag_id: Uuid,
        post_id: Uuid,
    ) -> Result<(), DomainError> {
        tracing::debug!(%tag_id, %post_id, "Unlinking tag from post");
        self.apply(Direction::Unlink, tag_id, post_id).await
    }

    async fn apply(
        &self,
        direction: Direction,
        tag_id: Uuid,
        post_id: Uuid,
    ) -> Result<(), DomainError> {
        if let Some(linker) = &self.linker {
            let outcome = match direction {
                Direction::Link => linker.link(tag_id, post_id).await?,
                Direction::Unlink => linker.unlink(tag_id, post_id).await?,
            };
            return match outcome {
                LinkOutcome::Applied | LinkOutcome::Unchanged => Ok(()),
                LinkOutcome::Missing(side) => Err(missing(side, tag_id, post_id)),
            };
        }

        let tag_change = match direction {
            Direction::Link => self.tags.add_post(tag_id, post_id).await?,
            Direction::Unlink => self.tags.remove_post(tag_id, post_id).await?,
        };
        if tag_change == ListChange::Missing {
            return Err(DomainError::not_found("Tag", tag_id));
        }

        let post_change = match direction {
            Direction::Link => self.posts.add_tag(post_id, tag_id).await,
            Direction::Unlink => self.posts.remove_tag(post_id, tag_id).await,
        };

        match post_change {
            Ok(ListChange::Changed | ListChange::Unchanged) => Ok(()),
            Ok(ListChange::Missing) => {
                self.revert_tag_side(direction, tag_id, post_id, tag_change)
                    .await;
                Err(DomainError::not_found("Post", post_id))
            }
            Err(e) => {
                self.revert_tag_side(direction, tag_id, post_id, tag_change)
                    .await;
                Err(e.into())
            }
        }
    }

    /// Undo the tag-side write after the post side could not follow.
    async fn revert_tag_side(
        &self,
        direction: Direction,
        tag_id: Uuid,
        post_id: Uuid,
        tag_change: ListChange,
    ) {
        if tag_change != ListChange::Changed {
            return;
        }

        tracing::warn!(%tag_id, %post_id, ?direction, "Post side failed, reverting tag side");

        let reverted = match direction {
            Direction::Link => self.tags.remove_post(tag_id, post_id).await,
            Direction::Unlink => self.tags.add_post(tag_id, post_id).await,
        };

        if let Err(e) = reverted {
            tracing::error!(
                %tag_id,
                %post_id,
                ?direction,
                error = %e,
                "Could not revert tag side; tag/post link is one-sided"
            );
        }
    }

    /// Record `post_id` in the author's posts list.
    ///
    /// A missing author is an `InvalidReference`: the post points at it.
    pub async fn attach_post_to_author(
        &self,
        author_id: Uuid,
        post_id: Uuid,
    ) -> Result<(), DomainError> {
        match self.authors.add_post(author_id, post_id).await? {
            ListChange::Missing => Err(DomainError::invalid_reference("Author", author_id)),
            ListChange::Changed | ListChange::Unchanged => Ok(()),
        }
    }

    /// Drop `post_id` from the author's posts list. A vanished author is
    /// tolerated.
    pub async fn detach_post_from_author(
        &self,
        author_id: Uuid,
        post_id: Uuid,
    ) -> Result<(), DomainError> {
        if self.authors.remove_post(author_id, post_id).await? == ListChange::Missing {
            tracing::debug!(%author_id, %post_id, "Author already gone, nothing to detach");
        }
        Ok(())
    }

    /// Post with its author expanded to `{id, name}`.
    pub async fn expand_post_author(&self, post_id: Uuid) -> Result<Option<PostView>, DomainError> {
        let Some(post) = self.posts.find_by_id(post_id).await? else {
            return Ok(None);
        };

        let author = self
            .authors
            .find_by_id(post.author)
            .await?
            .as_ref()
            .map(AuthorSummary::from);

        Ok(Some(PostView::new(post, author)))
    }

    /// Author with its posts list expanded to full documents.
    pub async fn expand_author_posts(
        &self,
        author_id: Uuid,
    ) -> Result<Option<AuthorView>, DomainError> {
        let Some(author) = self.authors.find_by_id(author_id).await? else {
            return Ok(None);
        };

        let mut found = self.load_posts(&author.posts).await?;
        let posts = author
            .posts
            .iter()
            .filter_map(|id| found.remove(id))
            .filter(|post| post.author == author.id)
            .collect();

        Ok(Some(AuthorView::new(author, posts)))
    }

    /// Tag with its posts list expanded to full documents.
    pub async fn expand_tag_posts(&self, tag_id: Uuid) -> Result<Option<TagView>, DomainError> {
        let Some(tag) = self.tags.find_by_id(tag_id).await? else {
            return Ok(None);
        };

        let mut found = self.load_posts(&tag.posts).await?;
        let posts = tag.posts.iter().filter_map(|id| found.remove(id)).collect();

        Ok(Some(TagView::new(tag, posts)))
    }

    /// Every post with its author expanded.
    pub async fn list_posts_with_authors(&self) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.find_all().await?;

        let author_ids: Vec<Uuid> = posts
            .iter()
            .map(|post| post.author)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let authors: HashMap<Uuid, AuthorSummary> = self
            .authors
            .find_many(&author_ids)
            .await?
            .iter()
            .map(|author| (author.id, AuthorSummary::from(author)))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author).cloned();
                PostView::new(post, author)
            })
            .collect())
    }

    /// Every author with its posts expanded.
    pub async fn list_authors_with_posts(&self) -> Result<Vec<AuthorView>, DomainError> {
        let authors = self.authors.find_all().await?;

        let post_ids: Vec<Uuid> = authors
            .iter()
            .flat_map(|author| author.posts.iter().copied())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let found = self.load_posts(&post_ids).await?;

        Ok(authors
            .into_iter()
            .map(|author| {
                let mut seen = HashSet::new();
                let posts = author
                    .posts
                    .iter()
                    .filter(|id| seen.insert(**id))
                    .filter_map(|id| found.get(id))
                    .filter(|post| post.author == author.id)
                    .cloned()
                    .collect();
                AuthorView::new(author, posts)
            })
            .collect())
    }

    async fn load_posts(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Post>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(self
            .posts
            .find_many(ids)
            .await?
            .into_iter()
            .map(|post| (post.id, post))
            .collect())
    }
}

fn missing(side: LinkSide, tag_id: Uuid, post_id: Uuid) -> DomainError {
    match side {
        LinkSide::Tag => DomainError::not_found("Tag", tag_id),
        LinkSide::Post => DomainError::not_found("Post", post_id),
    }
}
