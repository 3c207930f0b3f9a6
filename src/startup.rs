use crate::api_doc::ApiDoc;
use crate::authentication::JwtAuthority;
use crate::configuration::{DatabaseSettings, Settings, StorageBackend};
use crate::repository::{BlogRepository, InMemoryRepository, PostgresRepository, UserRepository};
use crate::routes::{auth, blog, health_check, user};
use crate::services::{AuthService, BlogService, UserService};
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

pub fn get_connection_pool(db_configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(db_configuration.connect_options())
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub blog_service: BlogService,
    pub user_service: UserService,
    pub jwt: JwtAuthority,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        blogs: Arc<dyn BlogRepository>,
        jwt: JwtAuthority,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users.clone(), jwt.clone()),
            blog_service: BlogService::new(blogs.clone(), users.clone()),
            user_service: UserService::new(users, blogs),
            jwt,
        }
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let jwt = JwtAuthority::new(
            &configuration.jwt.secret,
            configuration.jwt.token_lifetime(),
        );

        let state = match configuration.application.storage {
            StorageBackend::Postgres => {
                let pool = get_connection_pool(&configuration.database);
                if configuration.database.migrate_on_startup {
                    sqlx::migrate!("./migrations")
                        .run(&pool)
                        .await
                        .context("Failed to migrate the database.")?;
                }
                let repository = Arc::new(PostgresRepository::new(pool));
                AppState::new(repository.clone(), repository, jwt)
            }
            StorageBackend::InMemory => {
                tracing::warn!("Using in-memory storage, data is lost on shutdown");
                let repository = Arc::new(InMemoryRepository::new());
                AppState::new(repository.clone(), repository, jwt)
            }
        };

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind to {address}."))?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let app = build_router(self.state);
        let listener = tokio::net::TcpListener::from_std(self.listener)?;
        tracing::info!(port = self.port, "Listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health_check", get(health_check))
        .nest(
            "/api",
            Router::new()
                .route("/auth/signup", post(auth::signup))
                .route("/auth/login", post(auth::login))
                .route("/auth/test", get(auth::admin_test))
                .route("/blog", get(blog::get_blogs).post(blog::post_blog))
                .route(
                    "/blog/{blog_id}",
                    get(blog::get_blog)
                        .put(blog::update_blog)
                        .delete(blog::delete_blog),
                )
                .route("/user", get(user::get_users))
                .route(
                    "/user/{user_id}",
                    get(user::get_user)
                        .put(user::update_user)
                        .delete(user::delete_user),
                )
                .route(
                    "/user/search/{search_param}",
                    get(user::search_users).post(user::search_users),
                )
                .route("/user/{user_id}/blogs", get(user::get_user_blogs)),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(
                    |request: &Request<Body>| {
                        let request_id = Uuid::new_v4();
                        tracing::info_span!(
                            "http_request",
                            %request_id,
                            method = %request.method(),
                            uri = %request.uri(),
                        )
                    },
                ))
                .layer(CorsLayer::permissive()),
        )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
