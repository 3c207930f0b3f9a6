use crate::helpers::{TestUser, assert_error_response, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn signup_returns_a_token() {
    // Arrange
    let app = spawn_app().await;
    let user = TestUser::generate();

    // Act
    let response = app.post_signup(&user.signup_body()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn signup_persists_the_new_account() {
    let app = spawn_app().await;
    let user = TestUser::generate();

    let account = app.sign_up(user.clone()).await;

    let body: Value = app
        .get(&format!("/api/user/{}", account.user_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["username"], user.username.as_str());
    assert_eq!(body["data"]["fullName"], "Test User");
    assert_eq!(body["data"]["role"], 1);
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn signup_returns_400_for_invalid_data() {
    let app = spawn_app().await;
    let valid = TestUser::generate().signup_body();
    let test_cases = vec![
        ("username", json!("Has Capitals"), "'Username' must be consisted"),
        ("fullName", json!("R2 D2"), "'Full Name' must be consisted"),
        ("email", json!("not-an-email"), "'Email' is not a valid email address."),
        ("password", json!("short"), "'Password' must be between 8 and 50 characters."),
    ];

    for (field, value, expected) in test_cases {
        let mut body = valid.clone();
        body[field] = value;

        let response = app.post_signup(&body).await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not fail with 400 when {field} was invalid."
        );
        let error: Value = response.json().await.unwrap();
        assert!(
            error["message"].as_str().unwrap().contains(expected),
            "Unexpected message for {field}: {}",
            error["message"]
        );
    }
}

#[tokio::test]
async fn signup_returns_409_for_a_taken_username() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    app.sign_up(user.clone()).await;

    let mut body = TestUser::generate().signup_body();
    body["username"] = json!(user.username);
    let response = app.post_signup(&body).await;

    assert_error_response(response, 409, "The username is already taken.").await;
}

#[tokio::test]
async fn signup_returns_409_for_a_taken_email() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    app.sign_up(user.clone()).await;

    let mut body = TestUser::generate().signup_body();
    body["email"] = json!(user.email);
    let response = app.post_signup(&body).await;

    assert_error_response(response, 409, "The email is already taken.").await;
}

#[tokio::test]
async fn login_with_valid_credentials_returns_a_token() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    app.sign_up(user.clone()).await;

    let response = app
        .post_login(&json!({ "username": user.username, "password": user.password }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn login_with_a_wrong_password_returns_401() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    app.sign_up(user.clone()).await;

    let response = app
        .post_login(&json!({ "username": user.username, "password": "wrong-password" }))
        .await;

    assert_error_response(response, 401, "Username or password is incorrect.").await;
}

#[tokio::test]
async fn login_for_an_unknown_user_returns_404() {
    let app = spawn_app().await;

    let response = app
        .post_login(&json!({ "username": "nobody", "password": "whatever123" }))
        .await;

    assert_error_response(response, 404, "User not found.").await;
}

#[tokio::test]
async fn admin_test_route_requires_a_token() {
    let app = spawn_app().await;

    let response = app.get("/api/auth/test").await;

    assert_error_response(response, 401, "Authentication required.").await;
}

#[tokio::test]
async fn admin_test_route_rejects_regular_users() {
    let app = spawn_app().await;
    let user = app.sign_up(TestUser::generate()).await;

    let response = app.get_authorized("/api/auth/test", &user.token).await;

    assert_error_response(response, 403, "You are not authorized.").await;
}

#[tokio::test]
async fn admin_test_route_welcomes_admins() {
    let app = spawn_app().await;
    let admin = app.sign_up_admin().await;

    let response = app.get_authorized("/api/auth/test", &admin.token).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "Yo this is a test");
}

#[tokio::test]
async fn a_forged_token_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .get_authorized("/api/auth/test", "eyJhbGciOiJIUzUxMiJ9.e30.c2lnbmF0dXJl")
        .await;

    assert_error_response(response, 401, "Authentication required.").await;
}
