use crate::helpers::{TestUser, assert_error_response, spawn_app};
use serde_json::{Value, json};

fn update_body(full_name: &str, email: &str) -> Value {
    json!({ "fullName": full_name, "email": email })
}

#[tokio::test]
async fn users_are_listed_with_paging_information() {
    // Arrange
    let app = spawn_app().await;
    for _ in 0..3 {
        app.sign_up(TestUser::generate()).await;
    }

    // Act
    let body: Value = app
        .get("/api/user?pageNumber=2&pageSize=2")
        .await
        .json()
        .await
        .unwrap();

    // Assert
    assert_eq!(body["pageNumber"], 2);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["totalRecords"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["succeeded"], true);
}

#[tokio::test]
async fn a_missing_user_returns_404() {
    let app = spawn_app().await;

    let response = app.get("/api/user/31337").await;

    assert_error_response(response, 404, "User not found.").await;
}

#[tokio::test]
async fn users_can_update_their_profile() {
    let app = spawn_app().await;
    let user = app.sign_up(TestUser::generate()).await;

    let response = app
        .put_json(
            &format!("/api/user/{}", user.user_id),
            &update_body("Renamed Person", "renamed@example.com"),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["fullName"], "Renamed Person");
    assert_eq!(body["data"]["email"], "renamed@example.com");
    assert_eq!(body["data"]["username"], user.user.username.as_str());
}

#[tokio::test]
async fn users_cannot_update_someone_else() {
    let app = spawn_app().await;
    let victim = app.sign_up(TestUser::generate()).await;
    let intruder = app.sign_up(TestUser::generate()).await;

    let response = app
        .put_json(
            &format!("/api/user/{}", victim.user_id),
            &update_body("Hacked", "hacked@example.com"),
            Some(&intruder.token),
        )
        .await;

    assert_error_response(response, 403, "You are not authorized.").await;
}

#[tokio::test]
async fn an_invalid_update_is_rejected_with_400() {
    let app = spawn_app().await;
    let user = app.sign_up(TestUser::generate()).await;

    let response = app
        .put_json(
            &format!("/api/user/{}", user.user_id),
            &update_body("Name With 1 Digit", "valid@example.com"),
            Some(&user.token),
        )
        .await;

    assert_error_response(
        response,
        400,
        "'Full Name' must be consisted of letters and spaces only.",
    )
    .await;
}

#[tokio::test]
async fn changing_the_password_expires_older_tokens() {
    let app = spawn_app().await;
    let user = app.sign_up(TestUser::generate()).await;
    let path = format!("/api/user/{}", user.user_id);
    // `iat` has second precision; make sure the change lands in a later second.
    tokio::time::sleep(std::time::Duration::from_millis(2100)).await;

    let mut body = update_body("Test User", &user.user.email);
    body["password"] = json!("a-brand-new-password");
    let response = app.put_json(&path, &body, Some(&user.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    // Act
    let response = app
        .put_json(&path, &update_body("Test User", &user.user.email), Some(&user.token))
        .await;

    // Assert
    assert_error_response(response, 401, "Token is expired. Log in again.").await;
    let login = app
        .post_login(&json!({ "username": user.user.username, "password": "a-brand-new-password" }))
        .await;
    assert_eq!(login.status().as_u16(), 200);
}

#[tokio::test]
async fn deleting_a_user_deletes_their_blogs() {
    let app = spawn_app().await;
    let user = app.sign_up(TestUser::generate()).await;
    let blog = app.post_blog(&user, "Gone soon").await;

    let response = app
        .delete(&format!("/api/user/{}", user.user_id), Some(&user.token))
        .await;

    assert_eq!(response.status().as_u16(), 204);
    assert_error_response(
        app.get(&format!("/api/user/{}", user.user_id)).await,
        404,
        "User not found.",
    )
    .await;
    assert_error_response(
        app.get(&format!("/api/blog/{}", blog["blogId"])).await,
        404,
        "Blog not found.",
    )
    .await;
}

#[tokio::test]
async fn a_deleted_users_token_is_no_longer_accepted() {
    let app = spawn_app().await;
    let user = app.sign_up(TestUser::generate()).await;
    app.delete(&format!("/api/user/{}", user.user_id), Some(&user.token))
        .await;

    let response = app
        .post_json(
            "/api/blog",
            &json!({ "title": "Ghost", "description": "Boo." }),
            Some(&user.token),
        )
        .await;

    assert_error_response(response, 401, "Token is expired. Log in again.").await;
}

#[tokio::test]
async fn search_matches_username_and_full_name_case_insensitively() {
    let app = spawn_app().await;
    let mut ursula = TestUser::generate();
    ursula.full_name = "Ursula Le Guin".into();
    app.sign_up(ursula.clone()).await;
    app.sign_up(TestUser::generate()).await;

    for method in ["GET", "POST"] {
        let request = match method {
            "GET" => app.get("/api/user/search/le%20GUIN").await,
            _ => app.post_json("/api/user/search/le%20GUIN", &json!({}), None).await,
        };
        let body: Value = request.json().await.unwrap();
        assert_eq!(body["totalRecords"], 1, "{method}");
        assert_eq!(body["data"][0]["username"], ursula.username.as_str(), "{method}");
    }
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let app = spawn_app().await;
    app.sign_up(TestUser::generate()).await;

    let body: Value = app.get("/api/user/search/%25").await.json().await.unwrap();

    assert_eq!(body["totalRecords"], 0);
}

#[tokio::test]
async fn user_blogs_only_contain_that_users_posts() {
    let app = spawn_app().await;
    let author = app.sign_up(TestUser::generate()).await;
    let other = app.sign_up(TestUser::generate()).await;
    app.post_blog(&author, "Mine").await;
    app.post_blog(&author, "Also mine").await;
    app.post_blog(&other, "Not mine").await;

    let body: Value = app
        .get(&format!("/api/user/{}/blogs", author.user_id))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["totalRecords"], 2);
    let authors: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["authorId"].as_i64().unwrap())
        .collect();
    assert_eq!(authors, vec![author.user_id, author.user_id]);
}
