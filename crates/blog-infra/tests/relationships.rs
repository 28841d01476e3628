//! Service-level behaviour of author/post/tag references against the
//! in-memory store, with and without the transactional linker.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use blog_core::domain::{
    Author, AuthorChanges, AuthorPatch, NewAuthor, NewPost, NewTag, Post, PostChanges, PostPatch,
    Tag,
};
use blog_core::error::{DomainError, RepoError};
use blog_core::ports::{
    AuthorRepository, BaseRepository, ListChange, PostRepository, ReciprocalLinker,
};
use blog_core::{AuthorService, PostService, RelationshipManager, TagService};
use blog_infra::{InMemoryStore, Repositories};

struct Services {
    authors: AuthorService,
    posts: PostService,
    tags: TagService,
}

fn build(repos: Repositories, transactional: bool) -> Services {
    let mut relations = RelationshipManager::new(
        repos.authors.clone(),
        repos.posts.clone(),
        repos.tags.clone(),
    );
    if transactional {
        if let Some(linker) = repos.linker.clone() {
            relations = relations.with_linker(linker);
        }
    }
    let relations = Arc::new(relations);

    Services {
        authors: AuthorService::new(repos.authors.clone(), relations.clone()),
        posts: PostService::new(repos.posts.clone(), repos.authors.clone(), relations.clone()),
        tags: TagService::new(repos.tags.clone(), relations),
    }
}

async fn seed_post(services: &Services, author_name: &str) -> Post {
    let author = services
        .authors
        .create(NewAuthor {
            name: Some(author_name.into()),
        })
        .await
        .unwrap();

    services
        .posts
        .create(NewPost {
            title: Some("Hello".into()),
            body: Some("World".into()),
            author: Some(author.id.to_string()),
            image: None,
        })
        .await
        .unwrap()
}

async fn seed_tag(services: &Services, name: &str) -> Tag {
    services
        .tags
        .create(NewTag {
            name: Some(name.into()),
        })
        .await
        .unwrap()
}

async fn link_twice_keeps_single_entries(transactional: bool) {
    let store = Arc::new(InMemoryStore::new());
    let services = build(Repositories::from_memory(store.clone()), transactional);
    let post = seed_post(&services, "Ada").await;
    let tag = seed_tag(&services, "rust").await;

    services.tags.add_tag_to_post(post.id, tag.id).await.unwrap();
    services.tags.add_tag_to_post(post.id, tag.id).await.unwrap();

    let tag = BaseRepository::<Tag, Uuid>::find_by_id(store.as_ref(), tag.id)
        .await
        .unwrap()
        .unwrap();
    let post = BaseRepository::<Post, Uuid>::find_by_id(store.as_ref(), post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tag.posts, vec![post.id]);
    assert_eq!(post.tags, vec![tag.id]);
}

#[tokio::test]
async fn link_is_idempotent_with_two_writes() {
    link_twice_keeps_single_entries(false).await;
}

#[tokio::test]
async fn link_is_idempotent_in_one_transaction() {
    link_twice_keeps_single_entries(true).await;
}

#[tokio::test]
async fn link_reports_missing_tag() {
    let services = build(Repositories::in_memory(), false);
    let post = seed_post(&services, "Ada").await;
    let missing = Uuid::new_v4();

    let err = services
        .tags
        .add_tag_to_post(post.id, missing)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound { entity_type: "Tag", id } if id == missing
    ));
}

#[tokio::test]
async fn link_reports_missing_post_and_reverts_tag_side() {
    for transactional in [false, true] {
        let store = Arc::new(InMemoryStore::new());
        let services = build(Repositories::from_memory(store.clone()), transactional);
        let tag = seed_tag(&services, "rust").await;
        let missing = Uuid::new_v4();

        let err = services
            .tags
            .add_tag_to_post(missing, tag.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));

        let tag = BaseRepository::<Tag, Uuid>::find_by_id(store.as_ref(), tag.id)
            .await
            .unwrap()
            .unwrap();
        assert!(tag.posts.is_empty(), "transactional={transactional}");
    }
}

#[tokio::test]
async fn unlink_removes_both_sides() {
    let store = Arc::new(InMemoryStore::new());
    let services = build(Repositories::from_memory(store.clone()), false);
    let post = seed_post(&services, "Ada").await;
    let tag = seed_tag(&services, "rust").await;

    services.tags.add_tag_to_post(post.id, tag.id).await.unwrap();
    services
        .tags
        .remove_tag_from_post(post.id, tag.id)
        .await
        .unwrap();
    // Second unlink is a no-op.
    services
        .tags
        .remove_tag_from_post(post.id, tag.id)
        .await
        .unwrap();

    let view = services.tags.get_by_id(tag.id).await.unwrap().unwrap();
    assert!(view.posts.is_empty());
    let post = BaseRepository::<Post, Uuid>::find_by_id(store.as_ref(), post.id)
        .await
        .unwrap()
        .unwrap();
    assert!(post.tags.is_empty());
}

/// Post repository whose tag-list writes always fail.
struct FailingTagWrites {
    inner: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FailingTagWrites {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        BaseRepository::<Post, Uuid>::find_by_id(self.inner.as_ref(), id).await
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        BaseRepository::<Post, Uuid>::find_all(self.inner.as_ref()).await
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        BaseRepository::<Post, Uuid>::find_many(self.inner.as_ref(), ids).await
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.inner.save(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        BaseRepository::<Post, Uuid>::delete(self.inner.as_ref(), id).await
    }
}

#[async_trait]
impl PostRepository for FailingTagWrites {
    async fn add_tag(&self, _post_id: Uuid, _tag_id: Uuid) -> Result<ListChange, RepoError> {
        Err(RepoError::Query("injected failure".into()))
    }

    async fn remove_tag(&self, _post_id: Uuid, _tag_id: Uuid) -> Result<ListChange, RepoError> {
        Err(RepoError::Query("injected failure".into()))
    }

    async fn update_fields(
        &self,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        PostRepository::update_fields(self.inner.as_ref(), post_id, changes).await
    }
}

#[tokio::test]
async fn failed_post_write_reverts_tag_write() {
    let store = Arc::new(InMemoryStore::new());
    let healthy = build(Repositories::from_memory(store.clone()), false);
    let post = seed_post(&healthy, "Ada").await;
    let tag = seed_tag(&healthy, "rust").await;

    let mut repos = Repositories::from_memory(store.clone());
    repos.posts = Arc::new(FailingTagWrites {
        inner: store.clone(),
    });
    let flaky = build(repos, false);

    let err = flaky.tags.add_tag_to_post(post.id, tag.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Storage(RepoError::Query(_))));

    let tag = BaseRepository::<Tag, Uuid>::find_by_id(store.as_ref(), tag.id)
        .await
        .unwrap()
        .unwrap();
    assert!(tag.posts.is_empty());
}

#[tokio::test]
async fn failed_unlink_restores_tag_side() {
    let store = Arc::new(InMemoryStore::new());
    let healthy = build(Repositories::from_memory(store.clone()), false);
    let post = seed_post(&healthy, "Ada").await;
    let tag = seed_tag(&healthy, "rust").await;
    healthy.tags.add_tag_to_post(post.id, tag.id).await.unwrap();

    let mut repos = Repositories::from_memory(store.clone());
    repos.posts = Arc::new(FailingTagWrites {
        inner: store.clone(),
    });
    let flaky = build(repos, false);

    assert!(flaky.tags.remove_tag_from_post(post.id, tag.id).await.is_err());

    let tag = BaseRepository::<Tag, Uuid>::find_by_id(store.as_ref(), tag.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tag.posts, vec![post.id]);
}

#[tokio::test]
async fn create_post_requires_existing_author() {
    let services = build(Repositories::in_memory(), true);
    let ghost = Uuid::new_v4();

    let err = services
        .posts
        .create(NewPost {
            title: Some("t".into()),
            body: Some("b".into()),
            author: Some(ghost.to_string()),
            image: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::InvalidReference { entity_type: "Author", id } if id == ghost
    ));
    assert!(services.posts.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_post_validates_fields() {
    let services = build(Repositories::in_memory(), true);

    let missing_body = services
        .posts
        .create(NewPost {
            title: Some("t".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(missing_body, DomainError::Validation(_)));

    let malformed = services
        .posts
        .create(NewPost {
            title: Some("t".into()),
            body: Some("b".into()),
            author: Some("not-an-id".into()),
            image: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(malformed, DomainError::Malformed { entity_type: "Author", .. }));
}

#[tokio::test]
async fn post_round_trip_expands_author_name() {
    let services = build(Repositories::in_memory(), true);
    let post = seed_post(&services, "Grace").await;

    let view = services.posts.get_by_id(post.id).await.unwrap().unwrap();
    let author = view.author.unwrap();
    assert_eq!(author.name, "Grace");
    assert_eq!(author.id, post.author);
}

#[tokio::test]
async fn deleting_author_leaves_stale_reference() {
    let services = build(Repositories::in_memory(), true);
    let post = seed_post(&services, "Ada").await;

    services.authors.delete(post.author).await.unwrap();

    let view = services.posts.get_by_id(post.id).await.unwrap().unwrap();
    assert!(view.author.is_none());

    let all = services.posts.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].author.is_none());
}

#[tokio::test]
async fn deleting_post_leaves_stale_tag_entry_hidden_from_expansion() {
    let store = Arc::new(InMemoryStore::new());
    let services = build(Repositories::from_memory(store.clone()), true);
    let post = seed_post(&services, "Ada").await;
    let tag = seed_tag(&services, "rust").await;
    services.tags.add_tag_to_post(post.id, tag.id).await.unwrap();

    services.posts.delete(post.id).await.unwrap();

    let stored = BaseRepository::<Tag, Uuid>::find_by_id(store.as_ref(), tag.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.posts, vec![post.id]);

    let view = services.tags.get_by_id(tag.id).await.unwrap().unwrap();
    assert!(view.posts.is_empty());
}

#[tokio::test]
async fn author_listing_expands_posts() {
    let services = build(Repositories::in_memory(), true);
    let post = seed_post(&services, "Ada").await;

    let authors = services.authors.get_all().await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].posts, vec![post]);
}

#[tokio::test]
async fn moving_post_updates_both_authors() {
    let services = build(Repositories::in_memory(), true);
    let post = seed_post(&services, "Ada").await;
    let other = services
        .authors
        .create(NewAuthor {
            name: Some("Grace".into()),
        })
        .await
        .unwrap();

    let moved = services
        .posts
        .update(
            post.id,
            PostPatch {
                author: Some(other.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.author, other.id);

    let previous = services.authors.get_by_id(post.author).await.unwrap().unwrap();
    assert!(previous.posts.is_empty());
    let current = services.authors.get_by_id(other.id).await.unwrap().unwrap();
    assert_eq!(current.posts.len(), 1);
    assert_eq!(current.posts[0].id, post.id);
}

#[tokio::test]
async fn moving_post_to_unknown_author_is_rejected() {
    let services = build(Repositories::in_memory(), true);
    let post = seed_post(&services, "Ada").await;

    let err = services
        .posts
        .update(
            post.id,
            PostPatch {
                author: Some(Uuid::new_v4().to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidReference { .. }));

    let unchanged = services.posts.get_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.author.unwrap().id, post.author);
}

#[tokio::test]
async fn update_of_missing_document_is_not_found() {
    let services = build(Repositories::in_memory(), true);

    let err = services
        .posts
        .update(
            Uuid::new_v4(),
            PostPatch {
                title: Some("x".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn delete_of_missing_document_succeeds() {
    let services = build(Repositories::in_memory(), true);
    services.authors.delete(Uuid::new_v4()).await.unwrap();
    services.posts.delete(Uuid::new_v4()).await.unwrap();
    services.tags.delete(Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn author_expansion_skips_dangling_and_moved_posts() {
    let store = Arc::new(InMemoryStore::new());
    let services = build(Repositories::from_memory(store.clone()), true);
    let kept = seed_post(&services, "Ada").await;
    let ada = kept.author;
    let moved = services
        .posts
        .create(NewPost {
            title: Some("Second".into()),
            body: Some("Draft".into()),
            author: Some(ada.to_string()),
            image: None,
        })
        .await
        .unwrap();
    let grace = services
        .authors
        .create(NewAuthor {
            name: Some("Grace".into()),
        })
        .await
        .unwrap();
    services
        .posts
        .update(
            moved.id,
            PostPatch {
                author: Some(grace.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Leave a stale entry for the moved post and one for a post that never existed.
    AuthorRepository::add_post(store.as_ref(), ada, moved.id)
        .await
        .unwrap();
    AuthorRepository::add_post(store.as_ref(), ada, Uuid::new_v4())
        .await
        .unwrap();

    let view = services.authors.get_by_id(ada).await.unwrap().unwrap();
    assert_eq!(view.posts.len(), 1);
    assert_eq!(view.posts[0].id, kept.id);

    let listed = services.authors.get_all().await.unwrap();
    let listed_ada = listed.iter().find(|author| author.id == ada).unwrap();
    assert_eq!(listed_ada.posts, view.posts);

    assert!(services.authors.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

/// Post repository that lets a tag link land just before each field update.
struct LinkBeforeUpdate {
    inner: Arc<InMemoryStore>,
    tag_id: Uuid,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for LinkBeforeUpdate {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        BaseRepository::<Post, Uuid>::find_by_id(self.inner.as_ref(), id).await
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        BaseRepository::<Post, Uuid>::find_all(self.inner.as_ref()).await
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        BaseRepository::<Post, Uuid>::find_many(self.inner.as_ref(), ids).await
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.inner.link(self.tag_id, entity.id).await?;
        self.inner.save(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        BaseRepository::<Post, Uuid>::delete(self.inner.as_ref(), id).await
    }
}

#[async_trait]
impl PostRepository for LinkBeforeUpdate {
    async fn add_tag(&self, post_id: Uuid, tag_id: Uuid) -> Result<ListChange, RepoError> {
        PostRepository::add_tag(self.inner.as_ref(), post_id, tag_id).await
    }

    async fn remove_tag(&self, post_id: Uuid, tag_id: Uuid) -> Result<ListChange, RepoError> {
        PostRepository::remove_tag(self.inner.as_ref(), post_id, tag_id).await
    }

    async fn update_fields(
        &self,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        self.inner.link(self.tag_id, post_id).await?;
        PostRepository::update_fields(self.inner.as_ref(), post_id, changes).await
    }
}

#[tokio::test]
async fn post_update_keeps_concurrent_tag_link() {
    let store = Arc::new(InMemoryStore::new());
    let healthy = build(Repositories::from_memory(store.clone()), true);
    let post = seed_post(&healthy, "Ada").await;
    let tag = seed_tag(&healthy, "rust").await;

    let mut repos = Repositories::from_memory(store.clone());
    repos.posts = Arc::new(LinkBeforeUpdate {
        inner: store.clone(),
        tag_id: tag.id,
    });
    let racing = build(repos, true);

    let updated = racing
        .posts
        .update(
            post.id,
            PostPatch {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");

    let tag = BaseRepository::<Tag, Uuid>::find_by_id(store.as_ref(), tag.id)
        .await
        .unwrap()
        .unwrap();
    let post = BaseRepository::<Post, Uuid>::find_by_id(store.as_ref(), post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tag.posts, vec![post.id]);
    assert_eq!(post.tags, vec![tag.id]);
    assert_eq!(post.title, "Renamed");
}

/// Author repository that records an extra post just before each field update.
struct AttachBeforeUpdate {
    inner: Arc<InMemoryStore>,
    post_id: Uuid,
}

#[async_trait]
impl BaseRepository<Author, Uuid> for AttachBeforeUpdate {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        BaseRepository::<Author, Uuid>::find_by_id(self.inner.as_ref(), id).await
    }

    async fn find_all(&self) -> Result<Vec<Author>, RepoError> {
        BaseRepository::<Author, Uuid>::find_all(self.inner.as_ref()).await
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Author>, RepoError> {
        BaseRepository::<Author, Uuid>::find_many(self.inner.as_ref(), ids).await
    }

    async fn save(&self, entity: Author) -> Result<Author, RepoError> {
        AuthorRepository::add_post(self.inner.as_ref(), entity.id, self.post_id).await?;
        self.inner.save(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        BaseRepository::<Author, Uuid>::delete(self.inner.as_ref(), id).await
    }
}

#[async_trait]
impl AuthorRepository for AttachBeforeUpdate {
    async fn add_post(&self, author_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        AuthorRepository::add_post(self.inner.as_ref(), author_id, post_id).await
    }

    async fn remove_post(&self, author_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        AuthorRepository::remove_post(self.inner.as_ref(), author_id, post_id).await
    }

    async fn update_fields(
        &self,
        author_id: Uuid,
        changes: AuthorChanges,
    ) -> Result<Option<Author>, RepoError> {
        AuthorRepository::add_post(self.inner.as_ref(), author_id, self.post_id).await?;
        AuthorRepository::update_fields(self.inner.as_ref(), author_id, changes).await
    }
}

#[tokio::test]
async fn author_rename_keeps_concurrent_post_attach() {
    let store = Arc::new(InMemoryStore::new());
    let healthy = build(Repositories::from_memory(store.clone()), true);
    let post = seed_post(&healthy, "Ada").await;
    let late_post = Uuid::new_v4();

    let mut repos = Repositories::from_memory(store.clone());
    repos.authors = Arc::new(AttachBeforeUpdate {
        inner: store.clone(),
        post_id: late_post,
    });
    let racing = build(repos, true);

    let renamed = racing
        .authors
        .update(
            post.author,
            AuthorPatch {
                name: Some("Ada Lovelace".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Ada Lovelace");

    let stored = BaseRepository::<Author, Uuid>::find_by_id(store.as_ref(), post.author)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.posts, vec![post.id, late_post]);
}
