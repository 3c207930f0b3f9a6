use blogsite::configuration::{DatabaseSettings, Settings, StorageBackend, get_configuration};
use blogsite::startup::Application;
use blogsite::telemetry::{get_subscriber, init_subscriber};
use serde_json::{Value, json};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::LazyLock;
use uuid::Uuid;

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // The sink is part of the subscriber's type, hence the two branches.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    pub fn generate() -> Self {
        let username = Uuid::new_v4().simple().to_string()[..20].to_string();
        Self {
            email: format!("{username}@example.com"),
            full_name: "Test User".to_string(),
            password: Uuid::new_v4().to_string(),
            username,
        }
    }

    pub fn signup_body(&self) -> Value {
        json!({
            "username": self.username,
            "fullName": self.full_name,
            "email": self.email,
            "password": self.password,
        })
    }
}

/// A signed up account together with its bearer token and id.
pub struct LoggedInUser {
    pub user: TestUser,
    pub user_id: i64,
    pub token: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_accept(&self, path: &str, accept: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .header("Accept", accept)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_authorized(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn put_json(&self, path: &str, body: &Value, token: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.put(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.delete(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn post_signup(&self, body: &Value) -> reqwest::Response {
        self.post_json("/api/auth/signup", body, None).await
    }

    pub async fn post_login(&self, body: &Value) -> reqwest::Response {
        self.post_json("/api/auth/login", body, None).await
    }

    /// Signs `user` up and returns its token and id.
    pub async fn sign_up(&self, user: TestUser) -> LoggedInUser {
        let body = user.signup_body();
        self.sign_up_with(user, body).await
    }

    pub async fn sign_up_admin(&self) -> LoggedInUser {
        let user = TestUser::generate();
        let mut body = user.signup_body();
        body["role"] = json!(2);
        self.sign_up_with(user, body).await
    }

    async fn sign_up_with(&self, user: TestUser, body: Value) -> LoggedInUser {
        let response = self.post_signup(&body).await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.expect("Token response is JSON.");
        let token = body["token"].as_str().expect("Token is a string.").to_string();

        let found: Value = self
            .get(&format!("/api/user/search/{}", user.username))
            .await
            .json()
            .await
            .expect("Search response is JSON.");
        let user_id = found["data"][0]["userId"]
            .as_i64()
            .expect("The new account can be found.");

        LoggedInUser {
            user,
            user_id,
            token,
        }
    }

    /// Posts a blog as `author` and returns its `BlogDetails` JSON.
    pub async fn post_blog(&self, author: &LoggedInUser, title: &str) -> Value {
        let response = self
            .post_json(
                "/api/blog",
                &json!({ "title": title, "description": "Once upon a time." }),
                Some(&author.token),
            )
            .await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        body["data"].clone()
    }
}

/// Spawns the app on the in-memory store.
pub async fn spawn_app() -> TestApp {
    let mut configuration = test_configuration();
    configuration.application.storage = StorageBackend::InMemory;
    launch(configuration).await
}

/// Spawns the app on a freshly created and migrated Postgres database.
pub async fn spawn_app_with_postgres() -> TestApp {
    let mut configuration = test_configuration();
    configuration.application.storage = StorageBackend::Postgres;
    configure_database(&configuration.database).await;
    launch(configuration).await
}

/// Randomised configuration to ensure test isolation.
pub fn test_configuration() -> Settings {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    let mut c = get_configuration().expect("Failed to read configuration.");
    // Use a different database for each test case
    c.database.database_name = Uuid::new_v4().to_string();
    c.database.migrate_on_startup = false;
    // Use a random OS port
    c.application.port = 0;
    c.application.host = "127.0.0.1".to_string();
    c
}

async fn launch(configuration: Settings) -> TestApp {
    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());

    #[allow(clippy::let_underscore_future)]
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        api_client: reqwest::Client::new(),
    }
}

/// Creates the database named in `config` and runs the migrations on it.
pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let maintenance_settings = DatabaseSettings {
        database_name: "postgres".to_string(),
        ..config.clone()
    };
    let mut connection = PgConnection::connect_with(&maintenance_settings.connect_options())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(config.connect_options())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");
    connection_pool
}

/// Checks the failure envelope shared by every error response.
pub async fn assert_error_response(response: reqwest::Response, status: u16, message: &str) {
    assert_eq!(response.status().as_u16(), status);
    let body: Value = response.json().await.expect("Error body is JSON.");
    assert_eq!(body["succeeded"], false);
    assert_eq!(body["message"], message);
    assert_eq!(body["errors"], json!([message]));
}
