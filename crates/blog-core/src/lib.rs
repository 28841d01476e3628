//! # Blog Core
//!
//! The domain layer of the blog backend.
//! Entities, repository ports and the rules that keep references between
//! authors, posts and tags consistent. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
pub use services::{AuthorService, PostService, RelationshipManager, TagService};
