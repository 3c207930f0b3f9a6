use crate::domain::{
    BlogDetails, BlogUpdateData, LoginData, NewBlogData, SignupData, UserDetails, UserUpdateData,
};
use crate::routes;
use crate::wrappers::TokenResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Just Another Blogsite",
        description = "Blog platform API with JWT authentication"
    ),
    paths(
        routes::health_check::health_check,
        routes::auth::signup,
        routes::auth::login,
        routes::auth::admin_test,
        routes::blog::get_blogs,
        routes::blog::post_blog,
        routes::blog::get_blog,
        routes::blog::update_blog,
        routes::blog::delete_blog,
        routes::user::get_users,
        routes::user::get_user,
        routes::user::update_user,
        routes::user::delete_user,
        routes::user::search_users,
        routes::user::get_user_blogs,
    ),
    components(schemas(
        SignupData,
        LoginData,
        UserUpdateData,
        NewBlogData,
        BlogUpdateData,
        UserDetails,
        BlogDetails,
        TokenResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness check"),
        (name = "auth", description = "Signup and login"),
        (name = "blog", description = "Blog posts"),
        (name = "user", description = "Accounts, search and per-user blogs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
