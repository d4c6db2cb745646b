use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub course_id: i32,
    #[sea_orm(primary_key)]
    pub user_id: i32,

    #[sea_orm(belongs_to, from = "course_id", to = "id")]
    pub course: Option<super::course::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: Option<super::user::Entity>,

    pub enrolled_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
