//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod link;
mod repository;

pub use link::{LinkOutcome, LinkSide, ReciprocalLinker};
pub use repository::{AuthorRepository, BaseRepository, ListChange, PostRepository, TagRepository};
