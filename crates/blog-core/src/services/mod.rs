//! Resource services - validated CRUD over the repositories, delegating
//! every relationship-touching write to the [`RelationshipManager`].

mod authors;
mod posts;
mod relationships;
mod tags;

pub use authors::AuthorService;
pub use posts::PostService;
pub use relationships::RelationshipManager;
pub use tags::TagService;
