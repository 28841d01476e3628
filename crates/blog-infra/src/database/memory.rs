//! In-memory entity store - used when no database is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Author, AuthorChanges, Post, PostChanges, Tag};
use blog_core::error::RepoError;
use blog_core::ports::{
    AuthorRepository, BaseRepository, LinkOutcome, LinkSide, ListChange, PostRepository,
    ReciprocalLinker, TagRepository,
};

#[derive(Default)]
struct Collections {
    authors: HashMap<Uuid, Author>,
    posts: HashMap<Uuid, Post>,
    tags: HashMap<Uuid, Tag>,
}

/// A document stored in one of the collections.
trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn collection(docs: &Collections) -> &HashMap<Uuid, Self>;
    fn collection_mut(docs: &mut Collections) -> &mut HashMap<Uuid, Self>;
}

macro_rules! document {
    ($ty:ty, $field:ident) => {
        impl Document for $ty {
            fn id(&self) -> Uuid {
                self.id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            fn collection(docs: &Collections) -> &HashMap<Uuid, Self> {
                &docs.$field
            }

            fn collection_mut(docs: &mut Collections) -> &mut HashMap<Uuid, Self> {
                &mut docs.$field
            }
        }
    };
}

document!(Author, authors);
document!(Post, posts);
document!(Tag, tags);

/// All three collections behind one async RwLock.
///
/// A single lock makes every write, including the two-sided tag/post
/// link, atomic with respect to other callers.
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    docs: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Collections::default()),
        }
    }

    async fn modify<T, F>(&self, id: Uuid, f: F) -> ListChange
    where
        T: Document,
        F: FnOnce(&mut T) -> bool,
    {
        let mut docs = self.docs.write().await;
        let Some(doc) = T::collection_mut(&mut docs).get_mut(&id) else {
            return ListChange::Missing;
        };

        if f(doc) {
            ListChange::Changed
        } else {
            ListChange::Unchanged
        }
    }

    /// Edit a stored document in place and return the result.
    async fn edit<T, F>(&self, id: Uuid, f: F) -> Option<T>
    where
        T: Document,
        F: FnOnce(&mut T),
    {
        let mut docs = self.docs.write().await;
        let doc = T::collection_mut(&mut docs).get_mut(&id)?;
        f(doc);
        Some(doc.clone())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Document> BaseRepository<T, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let docs = self.docs.read().await;
        Ok(T::collection(&docs).get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        let docs = self.docs.read().await;
        let mut all: Vec<T> = T::collection(&docs).values().cloned().collect();
        all.sort_by_key(|doc| (doc.created_at(), doc.id()));
        Ok(all)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<T>, RepoError> {
        let docs = self.docs.read().await;
        let collection = T::collection(&docs);
        Ok(ids
            .iter()
            .filter_map(|id| collection.get(id).cloned())
            .collect())
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let mut docs = self.docs.write().await;
        T::collection_mut(&mut docs).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut docs = self.docs.write().await;
        T::collection_mut(&mut docs)
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl AuthorRepository for InMemoryStore {
    async fn add_post(&self, author_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        Ok(self
            .modify(author_id, |author: &mut Author| author.add_post(post_id))
            .await)
    }

    async fn remove_post(&self, author_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        Ok(self
            .modify(author_id, |author: &mut Author| author.remove_post(post_id))
            .await)
    }

    async fn update_fields(
        &self,
        author_id: Uuid,
        changes: AuthorChanges,
    ) -> Result<Option<Author>, RepoError> {
        Ok(self
            .edit(author_id, |author: &mut Author| author.apply(changes))
            .await)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn add_tag(&self, post_id: Uuid, tag_id: Uuid) -> Result<ListChange, RepoError> {
        Ok(self
            .modify(post_id, |post: &mut Post| post.add_tag(tag_id))
            .await)
    }

    async fn remove_tag(&self, post_id: Uuid, tag_id: Uuid) -> Result<ListChange, RepoError> {
        Ok(self
            .modify(post_id, |post: &mut Post| post.remove_tag(tag_id))
            .await)
    }

    async fn update_fields(
        &self,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        Ok(self
            .edit(post_id, |post: &mut Post| post.apply(changes))
            .await)
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn add_post(&self, tag_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        Ok(self
            .modify(tag_id, |tag: &mut Tag| tag.add_post(post_id))
            .await)
    }

    async fn remove_post(&self, tag_id: Uuid, post_id: Uuid) -> Result<ListChange, RepoError> {
        Ok(self
            .modify(tag_id, |tag: &mut Tag| tag.remove_post(post_id))
            .await)
    }
}

#[async_trait]
impl ReciprocalLinker for InMemoryStore {
    async fn link(&self, tag_id: Uuid, post_id: Uuid) -> Result<LinkOutcome, RepoError> {
        let mut docs = self.docs.write().await;
        let Collections { posts, tags, .. } = &mut *docs;

        let Some(tag) = tags.get_mut(&tag_id) else {
            return Ok(LinkOutcome::Missing(LinkSide::Tag));
        };
        let Some(post) = posts.get_mut(&post_id) else {
            return Ok(LinkOutcome::Missing(LinkSide::Post));
        };

        let tag_changed = tag.add_post(post_id);
        let post_changed = post.add_tag(tag_id);
        Ok(outcome(tag_changed || post_changed))
    }

    async fn unlink(&self, tag_id: Uuid, post_id: Uuid) -> Result<LinkOutcome, RepoError> {
        let mut docs = self.docs.write().await;
        let Collections { posts, tags, .. } = &mut *docs;

        let Some(tag) = tags.get_mut(&tag_id) else {
            return Ok(LinkOutcome::Missing(LinkSide::Tag));
        };
        let Some(post) = posts.get_mut(&post_id) else {
            return Ok(LinkOutcome::Missing(LinkSide::Post));
        };

        let tag_changed = tag.remove_post(post_id);
        let post_changed = post.remove_tag(tag_id);
        Ok(outcome(tag_changed || post_changed))
    }
}

fn outcome(changed: bool) -> LinkOutcome {
    if changed {
        LinkOutcome::Applied
    } else {
        LinkOutcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_find() {
        let store = InMemoryStore::new();
        let author = store.save(Author::new("Ada".into())).await.unwrap();

        let found = BaseRepository::<Author, Uuid>::find_by_id(&store, author.id)
            .await
            .unwrap();
        assert_eq!(found, Some(author));
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let store = InMemoryStore::new();
        let result = BaseRepository::<Tag, Uuid>::delete(&store, Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_update_on_missing_document() {
        let store = InMemoryStore::new();
        let change = TagRepository::add_post(&store, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(change, ListChange::Missing);
    }

    #[tokio::test]
    async fn test_link_leaves_nothing_written_when_post_missing() {
        let store = InMemoryStore::new();
        let tag = store.save(Tag::new("rust".into())).await.unwrap();

        let outcome = store.link(tag.id, Uuid::new_v4()).await.unwrap();
        assert_eq!(outcome, LinkOutcome::Missing(LinkSide::Post));

        let tag = BaseRepository::<Tag, Uuid>::find_by_id(&store, tag.id)
            .await
            .unwrap()
            .unwrap();
        assert!(tag.posts.is_empty());
    }

    #[tokio::test]
    async fn test_update_fields_keeps_reference_list() {
        let store = InMemoryStore::new();
        let post = store
            .save(Post::new("T".into(), "B".into(), Uuid::new_v4(), None))
            .await
            .unwrap();
        let tag_id = Uuid::new_v4();
        PostRepository::add_tag(&store, post.id, tag_id).await.unwrap();

        let changes = PostChanges {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        let updated = PostRepository::update_fields(&store, post.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.tags, vec![tag_id]);

        let missing = PostRepository::update_fields(&store, Uuid::new_v4(), PostChanges::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_many_skips_unknown_ids() {
        let store = InMemoryStore::new();
        let a = store.save(Author::new("A".into())).await.unwrap();
        let b = store.save(Author::new("B".into())).await.unwrap();

        let found = BaseRepository::<Author, Uuid>::find_many(&store, &[b.id, Uuid::new_v4(), a.id])
            .await
            .unwrap();
        assert_eq!(found, vec![b, a]);
    }
}
