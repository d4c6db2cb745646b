use serde_json::json;

use super::common::{TestApp, routes};

#[tokio::test]
async fn enroll_is_create_once() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, _) = app.create_published_course(&admin, "Joinable").await;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;

    let res = app
        .post_with_token(&routes::enroll(course_id), &json!({}), &student)
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let res = app
        .post_with_token(&routes::enroll(course_id), &json!({}), &student)
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}

#[tokio::test]
async fn draft_courses_cannot_be_joined() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let course_id = app.create_course(&admin, "Still Draft").await;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;

    let res = app
        .post_with_token(&routes::enroll(course_id), &json!({}), &student)
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unenroll_removes_the_enrollment() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, _) = app.create_published_course(&admin, "Leavable").await;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;
    app.enroll(course_id, &student).await;

    let res = app
        .delete_with_token(&routes::enroll(course_id), &student)
        .await;
    assert_eq!(res.status, 204, "{}", res.text);

    let res = app
        .delete_with_token(&routes::enroll(course_id), &student)
        .await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn my_learning_reports_completion_stats() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, slug) = app.create_published_course(&admin, "Tracked Course").await;
    let section_id = app.create_section(course_id, &admin, "Section").await;
    let first = app.create_lesson(section_id, &admin, "Lesson One").await;
    let _second = app.create_lesson(section_id, &admin, "Lesson Two").await;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;
    app.enroll(course_id, &student).await;

    app.post_with_token(
        routes::PROGRESS,
        &json!({"lessonId": first, "positionSec": 290, "completed": true}),
        &student,
    )
    .await;

    let res = app.get_with_token(routes::MY_LEARNING, &student).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let courses = res.body["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["courseId"], course_id);
    assert_eq!(courses[0]["slug"], slug.as_str());
    assert_eq!(courses[0]["totalLessons"], 2);
    assert_eq!(courses[0]["completedLessons"], 1);
}

#[tokio::test]
async fn my_learning_is_newest_first() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (older, _) = app.create_published_course(&admin, "Older").await;
    let (newer, _) = app.create_published_course(&admin, "Newer").await;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;
    app.enroll(older, &student).await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    app.enroll(newer, &student).await;

    let res = app.get_with_token(routes::MY_LEARNING, &student).await;
    let courses = res.body["courses"].as_array().unwrap();
    assert_eq!(courses[0]["title"], "Newer");
    assert_eq!(courses[1]["title"], "Older");
}

#[tokio::test]
async fn video_urls_are_gated_by_enrollment() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, slug) = app.create_published_course(&admin, "Gated Course").await;
    let section_id = app.create_section(course_id, &admin, "Section").await;
    app.create_lesson(section_id, &admin, "Paid Lesson").await;

    let preview = app
        .post_with_token(
            &routes::admin_lessons(section_id),
            &json!({
                "title": "Preview Lesson",
                "videoUrl": "/api/v1/assets/course-videos/preview.mp4",
                "freePreview": true,
            }),
            &admin,
        )
        .await;
    assert_eq!(preview.status, 201, "{}", preview.text);

    // Anonymous visitors only get free-preview URLs.
    let res = app.get_without_token(&routes::course_detail(&slug)).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["enrolled"], false);
    let lessons = res.body["sections"][0]["lessons"].as_array().unwrap();
    for lesson in lessons {
        if lesson["freePreview"] == true {
            assert!(lesson["videoUrl"].as_str().is_some());
        } else {
            assert!(lesson["videoUrl"].is_null());
        }
    }

    // Enrolled students see every URL.
    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;
    app.enroll(course_id, &student).await;

    let res = app
        .get_with_token(&routes::course_detail(&slug), &student)
        .await;
    assert_eq!(res.body["enrolled"], true);
    let lessons = res.body["sections"][0]["lessons"].as_array().unwrap();
    assert!(lessons.iter().all(|l| l["videoUrl"].as_str().is_some()));
}

#[tokio::test]
async fn course_detail_resolves_id_or_slug() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, slug) = app.create_published_course(&admin, "Addressable").await;

    let by_slug = app.get_without_token(&routes::course_detail(&slug)).await;
    assert_eq!(by_slug.status, 200, "{}", by_slug.text);

    let by_id = app
        .get_without_token(&routes::course_detail(&course_id.to_string()))
        .await;
    assert_eq!(by_id.status, 200, "{}", by_id.text);
    assert_eq!(by_id.body["slug"], slug.as_str());

    let missing = app.get_without_token(&routes::course_detail("no-such")).await;
    assert_eq!(missing.status, 404);
}

#[tokio::test]
async fn reviews_require_enrollment_and_upsert() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, _) = app.create_published_course(&admin, "Reviewable").await;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;

    let res = app
        .put_with_token(&routes::review(course_id), &json!({"rating": 4}), &student)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");

    app.enroll(course_id, &student).await;

    let res = app
        .put_with_token(
            &routes::review(course_id),
            &json!({"rating": 4, "comment": "Decent"}),
            &student,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["rating"], 4);

    // A second PUT replaces the previous rating rather than adding a row.
    let res = app
        .put_with_token(
            &routes::review(course_id),
            &json!({"rating": 5, "comment": "Got better"}),
            &student,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app.get_without_token(&routes::reviews(course_id)).await;
    let reviews = res.body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 5);
    assert_eq!(reviews[0]["comment"], "Got better");
}

#[tokio::test]
async fn review_rating_must_be_one_to_five() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, _) = app.create_published_course(&admin, "Strict Course").await;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;
    app.enroll(course_id, &student).await;

    let res = app
        .put_with_token(&routes::review(course_id), &json!({"rating": 6}), &student)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
