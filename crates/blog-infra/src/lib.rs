//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL entity store via SeaORM

pub mod database;

pub use database::{DatabaseConfig, InMemoryStore, Repositories};

#[cfg(feature = "postgres")]
pub use database::PostgresStore;
