//! SeaORM entities. Reference lists are stored as PostgreSQL `uuid[]`
//! columns, mirroring the document shape of the domain types.

pub mod author;
pub mod post;
pub mod tag;

use sea_orm::EntityTrait;

/// Entities listed oldest first.
pub trait Chronological: EntityTrait {
    fn created_at_column() -> Self::Column;
}

impl Chronological for author::Entity {
    fn created_at_column() -> Self::Column {
        author::Column::CreatedAt
    }
}

impl Chronological for post::Entity {
    fn created_at_column() -> Self::Column {
        post::Column::CreatedAt
    }
}

impl Chronological for tag::Entity {
    fn created_at_column() -> Self::Column {
        tag::Column::CreatedAt
    }
}
