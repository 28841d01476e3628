//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DbConn, DbErr, EntityTrait, QuerySelect, TransactionTrait};
use uuid::Uuid;

use blog_core::domain::{Author, AuthorChanges, Post, PostChanges, Tag};
use blog_core::error::RepoError;
use blog_core::ports::{
    AuthorRepository, LinkOutcome, LinkSide, ListChange, PostRepository, ReciprocalLinker,
    TagRepository,
};

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, transaction_error, updated_row};

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn add_post(&self, author_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        self.modify_locked(author_id, move |author: &mut Author| {
            author.add_post(post_id)
        })
        .await
    }

    async fn remove_post(&self, author_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        self.modify_locked(author_id, move |author: &mut Author| {
            author.remove_post(post_id)
        })
        .await
    }

    async fn update_fields(
        &self,
        author_id: Uuid,
        changes: AuthorChanges,
    ) -> Result<Option<Author>, RepoError> {
        let result = AuthorEntity::update(author::ActiveModel::from_changes(author_id, changes))
            .exec(&self.db)
            .await;

        Ok(updated_row(result)?.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn add_tag(&self, post_id: Uuid, tag_id: Uuid) -> Result<ListChange, RepoError> {
        self.modify_locked(post_id, move |post: &mut Post| post.add_tag(tag_id))
            .await
    }

    async fn remove_tag(&self, post_id: Uuid, tag_id: Uuid) -> Result<ListChange, RepoError> {
        self.modify_locked(post_id, move |post: &mut Post| post.remove_tag(tag_id))
            .await
    }

    async fn update_fields(
        &self,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::update(post::ActiveModel::from_changes(post_id, changes))
            .exec(&self.db)
            .await;

        Ok(updated_row(result)?.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn add_post(&self, tag_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        self.modify_locked(tag_id, move |tag: &mut Tag| tag.add_post(post_id))
            .await
    }

    async fn remove_post(&self, tag_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        self.modify_locked(tag_id, move |tag: &mut Tag| tag.remove_post(post_id))
            .await
    }
}

/// Tag/post linker running both list updates in one transaction.
///
/// Rows are locked tag first, then post, on every path.
pub struct PostgresLinker {
    db: DbConn,
}

impl PostgresLinker {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn apply(&self, tag_id: Uuid, post_id: Uuid, link: bool) -> Result<LinkOutcome, RepoError> {
        self.db
            .transaction::<_, LinkOutcome, DbErr>(move |txn| {
                Box::pin(async move {
                    let Some(tag_row) = TagEntity::find_by_id(tag_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(LinkOutcome::Missing(LinkSide::Tag));
                    };
                    let Some(post_row) = PostEntity::find_by_id(post_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(LinkOutcome::Missing(LinkSide::Post));
                    };

                    let mut tag_doc = Tag::from(tag_row);
                    let mut post_doc = Post::from(post_row);
                    let (tag_changed, post_changed) = if link {
                        (tag_doc.add_post(post_id), post_doc.add_tag(tag_id))
                    } else {
                        (tag_doc.remove_post(post_id), post_doc.remove_tag(tag_id))
                    };

                    if tag_changed {
                        tag::ActiveModel::from(tag_doc).update(txn).await?;
                    }
                    if post_changed {
                        post::ActiveModel::from(post_doc).update(txn).await?;
                    }

                    Ok(if tag_changed || post_changed {
                        LinkOutcome::Applied
                    } else {
                        LinkOutcome::Unchanged
                    })
                })
            })
            .await
            .map_err(transaction_error)
    }
}

#[async_trait]
impl ReciprocalLinker for PostgresLinker {
    async fn link(&self, tag_id: Uuid, post_id: Uuid) -> Result<LinkOutcome, RepoError> {
        tracing::debug!(%tag_id, %post_id, "Linking tag and post in one transaction");
        self.apply(tag_id, post_id, true).await
    }

    async fn unlink(&self, tag_id: Uuid, post_id: Uuid) -> Result<LinkOutcome, RepoError> {
        tracing::debug!(%tag_id, %post_id, "Unlinking tag and post in one transaction");
        self.apply(tag_id, post_id, false).await
    }
}
