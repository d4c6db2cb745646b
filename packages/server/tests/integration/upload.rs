use serde_json::json;

use super::common::{TestApp, routes};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn small_png() -> Vec<u8> {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(&[0u8; 64]);
    bytes
}

#[tokio::test]
async fn upload_requires_authentication() {
    let app = TestApp::spawn().await;

    let res = app.post_without_token(routes::UPLOAD, &json!({})).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn upload_is_admin_only() {
    let app = TestApp::spawn().await;
    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;

    let res = app
        .upload_with_token(routes::UPLOAD, "pic.png", "image/png", small_png(), &student)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn unsupported_content_types_are_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    let res = app
        .upload_with_token(
            routes::UPLOAD,
            "malware.exe",
            "application/octet-stream",
            vec![0u8; 16],
            &admin,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn oversized_images_are_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    // Image limit is 5 MiB; one byte over must fail.
    let bytes = vec![0u8; 5 * 1024 * 1024 + 1];
    let res = app
        .upload_with_token(routes::UPLOAD, "huge.png", "image/png", bytes, &admin)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn uploaded_images_are_served_back() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    let payload = small_png();
    let res = app
        .upload_with_token(
            routes::UPLOAD,
            "thumbnail.png",
            "image/png",
            payload.clone(),
            &admin,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let url = res.body["url"].as_str().expect("upload response has url");
    assert!(
        url.starts_with("/api/v1/assets/course-thumbnails/"),
        "unexpected url: {url}"
    );
    assert!(url.ends_with(".png"), "unexpected url: {url}");

    let res = app
        .client
        .get(format!("http://{}{}", app.addr, url))
        .send()
        .await
        .expect("Failed to fetch asset");
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers().get("Cache-Control").unwrap(),
        "public, max-age=86400"
    );
    assert_eq!(res.headers().get("Content-Type").unwrap(), "image/png");
    let body = res.bytes().await.expect("Failed to read asset body");
    assert_eq!(body.as_ref(), payload.as_slice());
}

#[tokio::test]
async fn videos_land_in_the_video_bucket() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    let res = app
        .upload_with_token(
            routes::UPLOAD,
            "intro.mp4",
            "video/mp4",
            vec![0u8; 1024],
            &admin,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let url = res.body["url"].as_str().unwrap();
    assert!(
        url.starts_with("/api/v1/assets/course-videos/"),
        "unexpected url: {url}"
    );
    assert!(url.ends_with(".mp4"), "unexpected url: {url}");
}

#[tokio::test]
async fn unknown_assets_report_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .get_without_token(&routes::asset("course-thumbnails", "missing.png"))
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");

    let res = app
        .get_without_token(&routes::asset("not-a-bucket", "file.png"))
        .await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn traversal_attempts_report_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .get_without_token(&routes::asset("course-thumbnails", "..%2F..%2Fetc%2Fpasswd"))
        .await;
    assert_eq!(res.status, 404);
}
