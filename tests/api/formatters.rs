use crate::helpers::{TestUser, spawn_app};

#[tokio::test]
async fn json_is_the_default_representation() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.get_with_accept("/api/blog", "*/*").await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn blogs_can_be_requested_as_xml() {
    let app = spawn_app().await;
    let author = app.sign_up(TestUser::generate()).await;
    app.post_blog(&author, "Angle <brackets>").await;

    let response = app.get_with_accept("/api/blog", "application/xml").await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/xml")
    );
    let body = response.text().await.unwrap();
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
    assert!(body.contains("<totalRecords>1</totalRecords>"));
    assert!(body.contains("<title>Angle &lt;brackets&gt;</title>"));
}

#[tokio::test]
async fn a_user_can_be_requested_as_html() {
    let app = spawn_app().await;
    let user = app.sign_up(TestUser::generate()).await;

    let response = app
        .get_with_accept(&format!("/api/user/{}", user.user_id), "text/html")
        .await;

    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let body = response.text().await.unwrap();
    assert!(body.contains("<title>Just Another Blogsite</title>"));
    assert!(body.contains(&format!("<p>username : {}</p>", user.user.username)));
}

#[tokio::test]
async fn users_can_be_requested_as_plain_text() {
    let app = spawn_app().await;
    let user = app.sign_up(TestUser::generate()).await;

    let response = app
        .get_with_accept("/api/user", "text/html;q=0.5, text/plain")
        .await;

    let body = response.text().await.unwrap();
    assert!(body.starts_with("pageNumber : 1\npageSize : 10\ntotalRecords : 1\n"));
    assert!(body.contains(&format!("username : \"{}\"", user.user.username)));
    assert!(body.ends_with("message : \n"));
}

#[tokio::test]
async fn errors_stay_json_whatever_is_accepted() {
    let app = spawn_app().await;

    let response = app.get_with_accept("/api/blog/77", "application/xml").await;

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Blog not found.");
}
