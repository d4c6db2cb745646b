use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub lesson_id: i32,
    #[sea_orm(primary_key)]
    pub user_id: i32,

    #[sea_orm(belongs_to, from = "lesson_id", to = "id")]
    pub lesson: Option<super::lesson::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: Option<super::user::Entity>,

    /// Last reported playback offset in seconds.
    pub position_sec: i32,
    /// Sticky: once true, later partial updates never unset it.
    pub completed: bool,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
