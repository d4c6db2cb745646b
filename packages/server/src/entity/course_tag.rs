use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub course_id: i32,
    #[sea_orm(primary_key)]
    pub tag_id: i32,

    #[sea_orm(belongs_to, from = "course_id", to = "id")]
    pub course: Option<super::course::Entity>,
    #[sea_orm(belongs_to, from = "tag_id", to = "id")]
    pub tag: Option<super::tag::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
