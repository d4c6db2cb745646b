use std::collections::HashMap;

use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::filter::{CatalogFilter, SortKey, round_one_decimal};
use crate::entity::{course, course_tag, enrollment, lesson, review, section, tag, user};
use crate::error::AppError;
use crate::models::catalog::{CourseListResponse, InstructorSummary, PublicCourse};
use crate::models::shared::{PageMeta, escape_like, page_offset};

const ENROLLMENT_COUNT_SQL: &str =
    r#"(SELECT COUNT(*) FROM "enrollment" WHERE "enrollment"."course_id" = "course"."id")"#;
const REVIEW_COUNT_SQL: &str =
    r#"(SELECT COUNT(*) FROM "review" WHERE "review"."course_id" = "course"."id")"#;

/// Run the catalog query for a normalized filter: one count query and one
/// page query over the same predicate, then batched lookups for the
/// per-course stats, instructors and tags.
pub async fn fetch_catalog_page(
    db: &DatabaseConnection,
    filter: &CatalogFilter,
) -> Result<CourseListResponse, AppError> {
    let mut select =
        course::Entity::find().filter(course::Column::Status.eq(course::STATUS_PUBLISHED));

    if let Some(ref category) = filter.category {
        select = select.filter(course::Column::Category.eq(category));
    }
    if let Some(ref level) = filter.level {
        select = select.filter(course::Column::Level.eq(level));
    }
    if let Some(min) = filter.min_price_cents {
        select = select.filter(course::Column::PriceCents.gte(min));
    }
    if let Some(max) = filter.max_price_cents {
        select = select.filter(course::Column::PriceCents.lte(max));
    }

    if let Some(ref search) = filter.search {
        let term = format!("%{}%", escape_like(search).to_lowercase());
        let matches = |col: course::Column| {
            Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(term.clone()).escape('\\'))
        };
        select = select.filter(
            Condition::any()
                .add(matches(course::Column::Title))
                .add(matches(course::Column::Subtitle))
                .add(matches(course::Column::Description)),
        );
    }

    let total_count = select.clone().count(db).await?;

    select = match filter.sort {
        SortKey::Popularity => select.order_by(Expr::cust(ENROLLMENT_COUNT_SQL), Order::Desc),
        SortKey::Rating => select.order_by(Expr::cust(REVIEW_COUNT_SQL), Order::Desc),
        SortKey::Newest => select.order_by(course::Column::CreatedAt, Order::Desc),
        SortKey::PriceLow => select.order_by(course::Column::PriceCents, Order::Asc),
        SortKey::PriceHigh => select.order_by(course::Column::PriceCents, Order::Desc),
    };
    // Stable tiebreak so pages never overlap.
    select = select.order_by(course::Column::Id, Order::Asc);

    let courses = select
        .offset(Some(page_offset(filter.page, filter.limit)))
        .limit(Some(filter.limit))
        .all(db)
        .await?;

    let stats = CourseStats::load(db, &courses).await?;

    let courses = courses
        .into_iter()
        .map(|c| stats.into_public(c))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CourseListResponse {
        courses,
        pagination: PageMeta::new(filter.page, filter.limit, total_count),
    })
}

/// Batched per-course aggregates for one result page.
struct CourseStats {
    enrollments: HashMap<i32, u64>,
    reviews: HashMap<i32, (u64, f64)>,
    lessons: HashMap<i32, u64>,
    instructors: HashMap<i32, user::Model>,
    tags: HashMap<i32, Vec<String>>,
}

impl CourseStats {
    async fn load(db: &DatabaseConnection, courses: &[course::Model]) -> Result<Self, AppError> {
        let course_ids: Vec<i32> = courses.iter().map(|c| c.id).collect();
        let instructor_ids: Vec<i32> = courses.iter().map(|c| c.created_by_id).collect();

        let enrollments: HashMap<i32, u64> = enrollment::Entity::find()
            .select_only()
            .column(enrollment::Column::CourseId)
            .column_as(enrollment::Column::UserId.count(), "count")
            .filter(enrollment::Column::CourseId.is_in(course_ids.clone()))
            .group_by(enrollment::Column::CourseId)
            .into_tuple::<(i32, i64)>()
            .all(db)
            .await?
            .into_iter()
            .map(|(id, n)| (id, n as u64))
            .collect();

        // Hidden reviews still count toward the aggregate stats; visibility
        // only affects the public review listing.
        let reviews: HashMap<i32, (u64, f64)> = review::Entity::find()
            .select_only()
            .column(review::Column::CourseId)
            .column_as(review::Column::Rating.count(), "count")
            .column_as(review::Column::Rating.sum(), "sum")
            .filter(review::Column::CourseId.is_in(course_ids.clone()))
            .group_by(review::Column::CourseId)
            .into_tuple::<(i32, i64, Option<i64>)>()
            .all(db)
            .await?
            .into_iter()
            .map(|(id, count, sum)| {
                let average = if count > 0 {
                    round_one_decimal(sum.unwrap_or(0) as f64 / count as f64)
                } else {
                    0.0
                };
                (id, (count as u64, average))
            })
            .collect();

        let lessons: HashMap<i32, u64> = lesson::Entity::find()
            .select_only()
            .column(section::Column::CourseId)
            .column_as(lesson::Column::Id.count(), "count")
            .inner_join(section::Entity)
            .filter(section::Column::CourseId.is_in(course_ids.clone()))
            .group_by(section::Column::CourseId)
            .into_tuple::<(i32, i64)>()
            .all(db)
            .await?
            .into_iter()
            .map(|(id, n)| (id, n as u64))
            .collect();

        let instructors: HashMap<i32, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(instructor_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let links = course_tag::Entity::find()
            .filter(course_tag::Column::CourseId.is_in(course_ids))
            .all(db)
            .await?;
        let tag_names: HashMap<i32, String> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(links.iter().map(|l| l.tag_id).collect::<Vec<_>>()))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        let mut tags: HashMap<i32, Vec<String>> = HashMap::new();
        for link in links {
            if let Some(name) = tag_names.get(&link.tag_id) {
                tags.entry(link.course_id).or_default().push(name.clone());
            }
        }
        for names in tags.values_mut() {
            names.sort();
        }

        Ok(CourseStats {
            enrollments,
            reviews,
            lessons,
            instructors,
            tags,
        })
    }

    fn into_public(&self, course: course::Model) -> Result<PublicCourse, AppError> {
        let instructor = self
            .instructors
            .get(&course.created_by_id)
            .ok_or_else(|| AppError::Internal(format!("Missing instructor for course {}", course.id)))?;
        let (review_count, average_rating) =
            self.reviews.get(&course.id).copied().unwrap_or((0, 0.0));

        Ok(PublicCourse {
            id: course.id,
            slug: course.slug,
            title: course.title,
            subtitle: course.subtitle,
            description: course.description,
            category: course.category,
            level: course.level,
            language: course.language,
            price: course.price_cents,
            thumbnail: course.thumbnail_url,
            created_at: course.created_at,
            instructor: InstructorSummary {
                id: instructor.id,
                name: instructor.name.clone().unwrap_or_default(),
                image: instructor.image.clone(),
            },
            enrollment_count: self.enrollments.get(&course.id).copied().unwrap_or(0),
            review_count,
            average_rating,
            total_lessons: self.lessons.get(&course.id).copied().unwrap_or(0),
            tags: self.tags.get(&course.id).cloned().unwrap_or_default(),
        })
    }
}
