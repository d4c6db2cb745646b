use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The role assigned to newly registered users.
pub const ROLE_STUDENT: &str = "student";

/// The role required for course editing and uploads.
pub const ROLE_ADMIN: &str = "admin";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,
    pub name: Option<String>,
    pub password: String,
    /// `admin` or `student`.
    pub role: String,
    pub image: Option<String>,

    #[sea_orm(has_many)]
    pub courses: HasMany<super::course::Entity>,

    #[sea_orm(has_many)]
    pub enrollments: HasMany<super::enrollment::Entity>,

    #[sea_orm(has_many)]
    pub reviews: HasMany<super::review::Entity>,

    #[sea_orm(has_many)]
    pub progress: HasMany<super::progress::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
