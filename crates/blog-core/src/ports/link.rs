//! Transactional tag/post link port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepoError;

/// Which side of a tag/post link failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSide {
    Tag,
    Post,
}

/// Result of a reciprocal link or unlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// At least one side changed; both sides now agree.
    Applied,
    /// Both sides already had the requested shape.
    Unchanged,
    /// Nothing was written.
    Missing(LinkSide),
}

/// Applies both sides of a tag/post link inside one store transaction.
///
/// Implemented by stores with multi-document transactions. Either both
/// lists are updated or neither is.
#[async_trait]
pub trait ReciprocalLinker: Send + Sync {
    async fn link(&self, tag_id: Uuid, post_id: Uuid) -> Result<LinkOutcome, RepoError>;

    async fn unlink(&self, tag_id: Uuid, post_id: Uuid) -> Result<LinkOutcome, RepoError>;
}
