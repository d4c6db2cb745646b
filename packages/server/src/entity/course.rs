use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Courses start as drafts, invisible to the public catalog.
pub const STATUS_DRAFT: &str = "DRAFT";

/// Published courses appear in the catalog.
pub const STATUS_PUBLISHED: &str = "PUBLISHED";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    /// `DRAFT` or `PUBLISHED`.
    pub status: String,
    /// Price in minor currency units.
    pub price_cents: i32,
    pub thumbnail_url: Option<String>,

    pub created_by_id: i32,
    #[sea_orm(belongs_to, from = "created_by_id", to = "id")]
    pub created_by: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub sections: HasMany<super::section::Entity>,

    #[sea_orm(has_many)]
    pub enrollments: HasMany<super::enrollment::Entity>,

    #[sea_orm(has_many)]
    pub reviews: HasMany<super::review::Entity>,

    #[sea_orm(has_many, via = "course_tag")]
    pub tags: HasMany<super::tag::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
