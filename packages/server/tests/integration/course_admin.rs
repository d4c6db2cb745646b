use serde_json::json;

use super::common::{TestApp, routes};

#[tokio::test]
async fn admin_api_rejects_students() {
    let app = TestApp::spawn().await;
    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;

    let res = app.get_with_token(routes::ADMIN_COURSES, &student).await;
    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");

    let res = app
        .post_with_token(
            routes::ADMIN_COURSES,
            &json!({"title": "Sneaky Course"}),
            &student,
        )
        .await;
    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn created_courses_start_as_drafts_with_generated_slugs() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    let res = app
        .post_with_token(
            routes::ADMIN_COURSES,
            &json!({"title": "  Advanced Rust!  ", "price": 9900}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["title"], "Advanced Rust!");
    assert_eq!(res.body["slug"], "advanced-rust");
    assert_eq!(res.body["status"], "DRAFT");
    assert_eq!(res.body["price"], 9900);
}

#[tokio::test]
async fn duplicate_titles_get_suffixed_slugs() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    let first = app
        .post_with_token(routes::ADMIN_COURSES, &json!({"title": "Same Title"}), &admin)
        .await;
    let second = app
        .post_with_token(routes::ADMIN_COURSES, &json!({"title": "Same Title"}), &admin)
        .await;
    assert_eq!(first.body["slug"], "same-title");
    assert_eq!(second.body["slug"], "same-title-2");
}

#[tokio::test]
async fn updates_are_partial_and_slugs_are_stable() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let id = app.create_course(&admin, "Original Title").await;

    let res = app
        .patch_with_token(&routes::admin_course(id), &json!({"title": "New Title"}), &admin)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["title"], "New Title");
    // Renaming does not touch the slug, so existing links keep working.
    assert_eq!(res.body["slug"], "original-title");
    // Fields omitted from the patch are untouched.
    assert_eq!(res.body["category"], "programming");
}

#[tokio::test]
async fn invalid_status_is_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let id = app.create_course(&admin, "Status Course").await;

    let res = app
        .patch_with_token(&routes::admin_course(id), &json!({"status": "ARCHIVED"}), &admin)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_refuses_published_courses_with_enrollments() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, _) = app.create_published_course(&admin, "Busy Course").await;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;
    app.enroll(course_id, &student).await;

    let res = app
        .delete_with_token(&routes::admin_course(course_id), &admin)
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}

#[tokio::test]
async fn drafts_can_always_be_deleted() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let id = app.create_course(&admin, "Abandoned Draft").await;

    let res = app.delete_with_token(&routes::admin_course(id), &admin).await;
    assert_eq!(res.status, 204, "{}", res.text);

    let res = app.get_with_token(&routes::admin_course(id), &admin).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn admin_list_includes_drafts_and_paginates() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    app.create_course(&admin, "Draft One").await;
    app.create_published_course(&admin, "Published One").await;
    app.create_course(&admin, "Draft Two").await;

    let res = app
        .get_with_token(&format!("{}?per_page=2", routes::ADMIN_COURSES), &admin)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["pagination"]["totalCount"], 3);
    assert_eq!(res.body["pagination"]["totalPages"], 2);
}

#[tokio::test]
async fn sections_are_appended_in_order() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Structured Course").await;

    let first = app
        .post_with_token(
            &routes::admin_sections(course_id),
            &json!({"title": "Basics"}),
            &admin,
        )
        .await;
    assert_eq!(first.status, 201, "{}", first.text);
    assert_eq!(first.body["position"], 0);

    let second = app
        .post_with_token(
            &routes::admin_sections(course_id),
            &json!({"title": "Advanced"}),
            &admin,
        )
        .await;
    assert_eq!(second.body["position"], 1);
}

#[tokio::test]
async fn sections_can_be_reordered() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Shuffled Course").await;

    let a = app.create_section(course_id, &admin, "First").await;
    let b = app.create_section(course_id, &admin, "Second").await;
    let c = app.create_section(course_id, &admin, "Third").await;

    let res = app
        .post_with_token(
            &routes::admin_sections_reorder(course_id),
            &json!({"orderedIds": [c, a, b]}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let titles: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Third", "First", "Second"]);
}

#[tokio::test]
async fn reorder_must_be_a_permutation() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Strict Course").await;

    let a = app.create_section(course_id, &admin, "First").await;
    app.create_section(course_id, &admin, "Second").await;

    // Missing an ID.
    let res = app
        .post_with_token(
            &routes::admin_sections_reorder(course_id),
            &json!({"orderedIds": [a]}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    // Duplicate IDs.
    let res = app
        .post_with_token(
            &routes::admin_sections_reorder(course_id),
            &json!({"orderedIds": [a, a]}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn deleting_a_section_removes_its_lessons() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Doomed Course").await;
    let section_id = app.create_section(course_id, &admin, "Doomed Section").await;
    let lesson_id = app.create_lesson(section_id, &admin, "Doomed Lesson").await;

    let res = app
        .delete_with_token(&routes::admin_section(section_id), &admin)
        .await;
    assert_eq!(res.status, 204, "{}", res.text);

    let res = app
        .patch_with_token(&routes::admin_lesson(lesson_id), &json!({}), &admin)
        .await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn lesson_slugs_are_unique_within_a_course() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Lessons Course").await;
    let section_id = app.create_section(course_id, &admin, "Section").await;

    let first = app
        .post_with_token(
            &routes::admin_lessons(section_id),
            &json!({"title": "Getting Started"}),
            &admin,
        )
        .await;
    let second = app
        .post_with_token(
            &routes::admin_lessons(section_id),
            &json!({"title": "Getting Started"}),
            &admin,
        )
        .await;
    assert_eq!(first.body["slug"], "getting-started");
    assert_eq!(second.body["slug"], "getting-started-2");
    assert_eq!(second.body["position"], 1);
}

#[tokio::test]
async fn lessons_can_be_reordered() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Ordered Course").await;
    let section_id = app.create_section(course_id, &admin, "Section").await;

    let a = app.create_lesson(section_id, &admin, "Alpha").await;
    let b = app.create_lesson(section_id, &admin, "Beta").await;

    let res = app
        .post_with_token(
            &routes::admin_lessons_reorder(section_id),
            &json!({"orderedIds": [b, a]}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let titles: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Beta", "Alpha"]);
}

#[tokio::test]
async fn lesson_updates_can_clear_nullable_fields() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Editable Course").await;
    let section_id = app.create_section(course_id, &admin, "Section").await;
    let lesson_id = app.create_lesson(section_id, &admin, "Editable Lesson").await;

    // Explicit null clears the video URL; omitting it leaves it alone.
    let res = app
        .patch_with_token(
            &routes::admin_lesson(lesson_id),
            &json!({"videoUrl": null}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert!(res.body["videoUrl"].is_null());
    assert_eq!(res.body["durationSec"], 300);

    let res = app
        .patch_with_token(
            &routes::admin_lesson(lesson_id),
            &json!({"title": "Renamed Lesson"}),
            &admin,
        )
        .await;
    assert_eq!(res.body["title"], "Renamed Lesson");
    assert_eq!(res.body["durationSec"], 300);
}

#[tokio::test]
async fn negative_duration_is_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Timed Course").await;
    let section_id = app.create_section(course_id, &admin, "Section").await;

    let res = app
        .post_with_token(
            &routes::admin_lessons(section_id),
            &json!({"title": "Bad Lesson", "durationSec": -10}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
