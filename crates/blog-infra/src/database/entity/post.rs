//! Post entity for SeaORM.

use blog_core::domain::PostChanges;
use sea_orm::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub author_id: Uuid,
    pub image: Option<String>,
    pub tag_ids: Vec<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

// No foreign key in the schema: deleting an author leaves the id dangling.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id"
    )]
    Author,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for blog_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            author: model.author_id,
            image: model.image,
            tags: model.tag_ids,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl ActiveModel {
    /// Scalar-only update; `tag_ids` and `created_at` stay `NotSet`.
    pub fn from_changes(id: Uuid, changes: PostChanges) -> Self {
        Self {
            id: Unchanged(id),
            title: changes.title.map_or(NotSet, Set),
            body: changes.body.map_or(NotSet, Set),
            author_id: changes.author.map_or(NotSet, Set),
            image: changes.image.map_or(NotSet, Set),
            tag_ids: NotSet,
            created_at: NotSet,
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<blog_core::domain::Post> for ActiveModel {
    fn from(post: blog_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            body: Set(post.body),
            author_id: Set(post.author),
            image: Set(post.image),
            tag_ids: Set(post.tags),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
