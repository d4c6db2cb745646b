use serde_json::json;

use super::common::{TestApp, routes};

#[tokio::test]
async fn register_returns_token_and_student_role() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::REGISTER,
            &json!({
                "email": "alice@example.com",
                "name": "Alice",
                "password": "s3cure_P@ss!",
            }),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert!(res.body["token"].as_str().is_some());
    assert_eq!(res.body["user"]["role"], "student");
    assert_eq!(res.body["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::spawn().await;

    let body = json!({
        "email": "dup@example.com",
        "name": "First",
        "password": "password123",
    });
    let first = app.post_without_token(routes::REGISTER, &body).await;
    assert_eq!(first.status, 201, "{}", first.text);

    let second = app.post_without_token(routes::REGISTER, &body).await;
    assert_eq!(second.status, 409);
    assert_eq!(second.body["code"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::spawn().await;
    app.create_authenticated_user("bob@example.com", "password123")
        .await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"email": "bob@example.com", "password": "wrong-password"}),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn me_requires_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::ME).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");

    let token = app
        .create_authenticated_user("carol@example.com", "password123")
        .await;
    let res = app.get_with_token(routes::ME, &token).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["email"], "carol@example.com");
}

#[tokio::test]
async fn validation_errors_are_structured() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::REGISTER,
            &json!({"email": "not-an-email", "name": "X", "password": "password123"}),
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = app
        .post_without_token(
            routes::REGISTER,
            &json!({"email": "short@example.com", "name": "X", "password": "short"}),
        )
        .await;
    assert_eq!(res.status, 400);
}
