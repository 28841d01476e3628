use std::sync::Arc;
#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

use blog_core::ports::{AuthorRepository, PostRepository, ReciprocalLinker, TagRepository};

use super::memory::InMemoryStore;
#[cfg(feature = "postgres")]
use super::postgres_repo::{
    PostgresAuthorRepository, PostgresLinker, PostgresPostRepository, PostgresTagRepository,
};

/// Configuration for the PostgreSQL entity store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// The repositories of one entity store, ready to inject into services.
#[derive(Clone)]
pub struct Repositories {
    pub authors: Arc<dyn AuthorRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    /// Present when the store can write both sides of a tag/post link atomically.
    pub linker: Option<Arc<dyn ReciprocalLinker>>,
}

impl Repositories {
    /// Repositories over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(InMemoryStore::new()))
    }

    pub fn from_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            authors: store.clone(),
            posts: store.clone(),
            tags: store.clone(),
            linker: Some(store),
        }
    }
}

/// Handle to the PostgreSQL store with an explicit open/close lifecycle.
#[cfg(feature = "postgres")]
pub struct PostgresStore {
    conn: DbConn,
}

#[cfg(feature = "postgres")]
impl PostgresStore {
    /// Open the connection pool.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Connecting to database...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!("Database connected (pool: {})", config.max_connections);

        Ok(Self { conn })
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            authors: Arc::new(PostgresAuthorRepository::new(self.conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(self.conn.clone())),
            tags: Arc::new(PostgresTagRepository::new(self.conn.clone())),
            linker: Some(Arc::new(PostgresLinker::new(self.conn.clone()))),
        }
    }

    /// Close the pool. Repositories handed out earlier stop working.
    pub async fn close(self) -> Result<(), DbErr> {
        tracing::info!("Closing database connection");
        self.conn.close().await
    }
}
