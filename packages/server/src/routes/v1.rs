use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/courses", course_routes())
        .nest("/my-learning", my_learning_routes())
        .nest("/progress", progress_routes())
        .nest("/admin", admin_routes())
        .nest("/upload", upload_routes())
        .nest("/assets", asset_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn course_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::catalog::list_public_courses))
        .routes(routes!(handlers::catalog::get_course_detail))
        .routes(routes!(
            handlers::enrollment::enroll,
            handlers::enrollment::unenroll
        ))
        .routes(routes!(handlers::review::put_review))
        .routes(routes!(handlers::review::list_reviews))
}

fn my_learning_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::enrollment::my_learning))
}

fn progress_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::progress::get_progress,
        handlers::progress::record_progress
    ))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::course_admin::list_courses,
            handlers::course_admin::create_course
        ))
        .routes(routes!(
            handlers::course_admin::get_course,
            handlers::course_admin::update_course,
            handlers::course_admin::delete_course
        ))
        .routes(routes!(handlers::course_admin::create_section))
        .routes(routes!(handlers::course_admin::reorder_sections))
        .routes(routes!(
            handlers::course_admin::update_section,
            handlers::course_admin::delete_section
        ))
        .routes(routes!(handlers::course_admin::create_lesson))
        .routes(routes!(handlers::course_admin::reorder_lessons))
        .routes(routes!(
            handlers::course_admin::update_lesson,
            handlers::course_admin::delete_lesson
        ))
}

fn upload_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_media))
        .layer(handlers::upload::upload_body_limit())
}

fn asset_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::assets::get_asset))
}
