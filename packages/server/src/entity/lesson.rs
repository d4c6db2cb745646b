use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    /// Routing slug, unique within the lesson's course.
    pub slug: String,
    /// Display order within the section, ascending from 0.
    pub position: i32,
    pub video_url: Option<String>,
    pub duration_sec: Option<i32>,
    /// Accessible without an enrollment.
    pub free_preview: bool,

    pub section_id: i32,
    #[sea_orm(belongs_to, from = "section_id", to = "id")]
    pub section: HasOne<super::section::Entity>,

    #[sea_orm(has_many)]
    pub progress: HasMany<super::progress::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
