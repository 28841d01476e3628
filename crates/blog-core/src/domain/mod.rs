//! Domain entities - the core business objects.

mod author;
mod expanded;
mod input;
mod post;
mod tag;

pub use author::Author;
pub use expanded::{AuthorSummary, AuthorView, PostView, TagView};
pub use input::{
    AuthorChanges, AuthorPatch, NewAuthor, NewPost, NewTag, PostChanges, PostPatch,
};
pub use post::Post;
pub use tag::Tag;

use uuid::Uuid;

/// Set-union insert into a reference list. Returns `true` if the list changed.
pub(crate) fn insert_unique(list: &mut Vec<Uuid>, id: Uuid) -> bool {
    if list.contains(&id) {
        return false;
    }
    list.push(id);
    true
}

/// Remove every occurrence of `id`. Returns `true` if the list changed.
pub(crate) fn remove_all(list: &mut Vec<Uuid>, id: Uuid) -> bool {
    let before = list.len();
    list.retain(|existing| *existing != id);
    list.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_unique_is_a_set_union() {
        let id = Uuid::new_v4();
        let mut list = Vec::new();

        assert!(insert_unique(&mut list, id));
        assert!(!insert_unique(&mut list, id));
        assert_eq!(list, vec![id]);
    }

    #[test]
    fn remove_all_drops_legacy_duplicates() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut list = vec![id, other, id];

        assert!(remove_all(&mut list, id));
        assert_eq!(list, vec![other]);
        assert!(!remove_all(&mut list, id));
    }
}
