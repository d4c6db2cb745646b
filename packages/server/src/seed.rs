use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::{course, enrollment, lesson, progress, review, section, user};
use crate::utils::{hash, password};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        // Catalog base predicate plus the newest / price sorts.
        Index::create()
            .if_not_exists()
            .name("idx_course_status_created")
            .table(course::Entity)
            .col(course::Column::Status)
            .col(course::Column::CreatedAt)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_course_status_price")
            .table(course::Entity)
            .col(course::Column::Status)
            .col(course::Column::PriceCents)
            .to_string(PostgresQueryBuilder),
        // Per-course stat aggregation.
        Index::create()
            .if_not_exists()
            .name("idx_enrollment_course")
            .table(enrollment::Entity)
            .col(enrollment::Column::CourseId)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_review_course")
            .table(review::Entity)
            .col(review::Column::CourseId)
            .to_string(PostgresQueryBuilder),
        // Curriculum ordering.
        Index::create()
            .if_not_exists()
            .name("idx_section_course_position")
            .table(section::Entity)
            .col(section::Column::CourseId)
            .col(section::Column::Position)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_lesson_section_position")
            .table(lesson::Entity)
            .col(lesson::Column::SectionId)
            .col(lesson::Column::Position)
            .to_string(PostgresQueryBuilder),
        // The learning dashboard scans a user's completed lessons.
        Index::create()
            .if_not_exists()
            .name("idx_progress_user_completed")
            .table(progress::Entity)
            .col(progress::Column::UserId)
            .col(progress::Column::Completed)
            .to_string(PostgresQueryBuilder),
    ];

    for stmt in statements {
        if let Err(e) = db.execute_unprepared(&stmt).await {
            tracing::warn!("Failed to create index: {} ({})", stmt, e);
        }
    }
    info!("Ensured catalog and curriculum indexes exist");

    Ok(())
}

/// Ensure a bootstrap admin account exists.
///
/// Uses the configured password when set; otherwise generates one and
/// logs it exactly once, at creation.
pub async fn seed_admin(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<()> {
    let email = auth.admin_email.trim().to_lowercase();
    if email.is_empty() {
        return Ok(());
    }

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let (password, generated) = match &auth.admin_password {
        Some(p) if !p.is_empty() => (p.clone(), false),
        _ => (password::generate_password(16), true),
    };

    let admin = user::ActiveModel {
        email: Set(email.clone()),
        name: Set(Some("Administrator".to_string())),
        password: Set(hash::hash_password(&password)?),
        role: Set(user::ROLE_ADMIN.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match admin.insert(db).await {
        Ok(_) => {
            if generated {
                info!("Created admin account {email} with generated password: {password}");
            } else {
                info!("Created admin account {email}");
            }
            Ok(())
        }
        Err(e) => match e.sql_err() {
            // Another instance won the race.
            Some(SqlErr::UniqueConstraintViolation(_)) => Ok(()),
            _ => Err(e.into()),
        },
    }
}
