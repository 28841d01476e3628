//! Author entity for SeaORM.

use blog_core::domain::AuthorChanges;
use sea_orm::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub post_ids: Vec<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Author.
impl From<Model> for blog_core::domain::Author {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            posts: model.post_ids,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl ActiveModel {
    /// Scalar-only update; `post_ids` and `created_at` stay `NotSet`.
    pub fn from_changes(id: Uuid, changes: AuthorChanges) -> Self {
        Self {
            id: Unchanged(id),
            name: changes.name.map_or(NotSet, Set),
            post_ids: NotSet,
            created_at: NotSet,
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}

/// Conversion from Domain Author to SeaORM ActiveModel.
impl From<blog_core::domain::Author> for ActiveModel {
    fn from(author: blog_core::domain::Author) -> Self {
        Self {
            id: Set(author.id),
            name: Set(author.name),
            post_ids: Set(author.posts),
            created_at: Set(author.created_at.into()),
            updated_at: Set(author.updated_at.into()),
        }
    }
}
