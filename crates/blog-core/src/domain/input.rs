//! Unvalidated inputs accepted by the resource services.
//!
//! Required fields are `Option`s on purpose: absence is reported as a
//! validation failure by the service, not as a deserialization error.

use uuid::Uuid;

/// Fields for creating an author.
#[derive(Debug, Clone, Default)]
pub struct NewAuthor {
    pub name: Option<String>,
}

/// Partial author update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AuthorPatch {
    pub name: Option<String>,
}

/// Fields for creating a post. `author` is the raw identifier as received.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
}

/// Partial post update.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
}

/// Fields for creating a tag.
#[derive(Debug, Clone, Default)]
pub struct NewTag {
    pub name: Option<String>,
}

/// Validated scalar changes to an author. Never touches `posts`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorChanges {
    pub name: Option<String>,
}

/// Validated scalar changes to a post. Never touches `tags`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<Uuid>,
    /// `Some(None)` clears the image.
    pub image: Option<Option<String>>,
}
