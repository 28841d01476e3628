//! Data Transfer Objects - request/response types for the API.
//!
//! Required fields are optional here so that a missing field reaches the
//! service and is reported as a validation failure.

use serde::{Deserialize, Serialize};

/// Request to create an author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: Option<String>,
}

/// Partial author update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAuthorRequest {
    pub name: Option<String>,
}

/// Request to create a post. `author` is the author's id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
}

/// Partial post update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
}

/// Request to create a tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: Option<String>,
}

/// Plain acknowledgement, e.g. `{"message": "Post deleted"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
