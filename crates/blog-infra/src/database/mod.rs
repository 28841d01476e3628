//! Entity store implementations and connection management.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::{DatabaseConfig, Repositories};
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use connections::PostgresStore;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresAuthorRepository, PostgresLinker, PostgresPostRepository, PostgresTagRepository,
};
