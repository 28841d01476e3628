//! # Blog Shared
//!
//! Wire types shared by the API server and its clients.

pub mod dto;
pub mod response;

pub use dto::MessageResponse;
pub use response::ErrorResponse;
