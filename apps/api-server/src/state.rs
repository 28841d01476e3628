//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::{AuthorService, PostService, RelationshipManager, TagService};
use blog_infra::{DatabaseConfig, Repositories};

#[cfg(feature = "postgres")]
use blog_infra::PostgresStore;

enum Backend {
    Memory,
    #[cfg(feature = "postgres")]
    Postgres(PostgresStore),
}

/// The entity store the server runs on, opened once at startup and closed
/// on shutdown.
pub struct Store {
    repositories: Repositories,
    backend: Backend,
}

impl Store {
    /// Open the configured store, falling back to memory when the database
    /// is absent or unreachable.
    pub async fn open(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match PostgresStore::connect(config).await {
                    Ok(store) => {
                        return Self {
                            repositories: store.repositories(),
                            backend: Backend::Postgres(store),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
        }

        Self::in_memory()
    }

    pub fn in_memory() -> Self {
        Self {
            repositories: Repositories::in_memory(),
            backend: Backend::Memory,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.backend {
            Backend::Memory => "memory",
            #[cfg(feature = "postgres")]
            Backend::Postgres(_) => "postgres",
        }
    }

    pub fn repositories(&self) -> Repositories {
        self.repositories.clone()
    }

    /// Release the store's connections.
    pub async fn close(self) {
        match self.backend {
            Backend::Memory => tracing::info!("In-memory store dropped"),
            #[cfg(feature = "postgres")]
            Backend::Postgres(store) => {
                if let Err(e) = store.close().await {
                    tracing::error!("Failed to close database connection: {}", e);
                }
            }
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authors: AuthorService,
    pub posts: PostService,
    pub tags: TagService,
    pub store_name: &'static str,
}

impl AppState {
    /// Wire the services onto the store's repositories.
    pub fn new(store: &Store) -> Self {
        let repos = store.repositories();

        let mut relations =
            RelationshipManager::new(repos.authors.clone(), repos.posts.clone(), repos.tags.clone());
        if let Some(linker) = repos.linker.clone() {
            relations = relations.with_linker(linker);
        }
        let relations = Arc::new(relations);

        tracing::info!(
            store = store.name(),
            transactional_links = relations.is_transactional(),
            "Application state initialized"
        );

        Self {
            authors: AuthorService::new(repos.authors.clone(), relations.clone()),
            posts: PostService::new(repos.posts.clone(), repos.authors.clone(), relations.clone()),
            tags: TagService::new(repos.tags.clone(), relations),
            store_name: store.name(),
        }
    }
}
