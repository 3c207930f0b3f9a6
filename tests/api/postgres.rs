//! Runs against a live Postgres instance, one fresh database per test.

use crate::helpers::{TestUser, configure_database, spawn_app_with_postgres, test_configuration};
use blogsite::domain::{PaginationFilter, Role};
use blogsite::repository::{
    BlogRepository, NewBlog, NewUser, PostgresRepository, RepositoryError, UserRepository,
};
use chrono::{Duration, TimeZone, Utc};
use claims::{assert_err, assert_none, assert_ok, assert_some};
use secrecy::Secret;
use serde_json::{Value, json};

async fn repository() -> PostgresRepository {
    let configuration = test_configuration();
    let pool = configure_database(&configuration.database).await;
    PostgresRepository::new(pool)
}

fn new_user(username: &str, full_name: &str) -> NewUser {
    NewUser {
        username: username.into(),
        full_name: full_name.into(),
        email: format!("{username}@example.com"),
        password_hash: Secret::new("$argon2id$hash".into()),
        role: Role::User,
        created_at: Utc::now(),
    }
}

fn new_blog(author_id: i32, title: &str, minutes: i64) -> NewBlog {
    NewBlog {
        title: title.into(),
        description: "Once upon a time.".into(),
        author_id,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            + Duration::minutes(minutes),
    }
}

#[tokio::test]
async fn a_duplicate_username_is_reported_as_such() {
    let repo = repository().await;
    assert_ok!(repo.create_user(new_user("ursula", "Ursula")).await);

    let mut duplicate = new_user("ursula", "Other Ursula");
    duplicate.email = "other@example.com".into();
    let error = assert_err!(repo.create_user(duplicate).await);

    assert!(matches!(error, RepositoryError::UniqueViolation(ref field) if field == "username"));
}

#[tokio::test]
async fn a_duplicate_email_is_reported_as_such() {
    let repo = repository().await;
    assert_ok!(repo.create_user(new_user("ursula", "Ursula")).await);

    let mut duplicate = new_user("terry", "Terry");
    duplicate.email = "ursula@example.com".into();
    let error = assert_err!(repo.create_user(duplicate).await);

    assert!(matches!(error, RepositoryError::UniqueViolation(ref field) if field == "email"));
}

#[tokio::test]
async fn updating_to_a_taken_email_is_a_unique_violation() {
    let repo = repository().await;
    repo.create_user(new_user("ursula", "Ursula")).await.unwrap();
    let mut terry = repo.create_user(new_user("terry", "Terry")).await.unwrap();

    terry.email = "ursula@example.com".into();
    let error = assert_err!(repo.update_user(terry).await);

    assert!(matches!(error, RepositoryError::UniqueViolation(ref field) if field == "email"));
}

#[tokio::test]
async fn search_is_case_insensitive_and_matches_wildcards_literally() {
    let repo = repository().await;
    repo.create_user(new_user("ursula", "Ursula Le Guin")).await.unwrap();
    repo.create_user(new_user("terry", "Terry Pratchett")).await.unwrap();
    repo.create_user(new_user("percent", "One 100% Fan")).await.unwrap();
    repo.create_user(new_user("under_score", "Someone")).await.unwrap();
    let page = PaginationFilter::default();

    let found = repo.search_users("GUIN", page).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "ursula");

    let found = repo.search_users("%", page).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "percent");
    assert_eq!(repo.get_search_user_count("%").await.unwrap(), 1);

    let found = repo.search_users("_", page).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "under_score");
}

#[tokio::test]
async fn deleting_a_user_removes_their_blogs() {
    let repo = repository().await;
    let author = repo.create_user(new_user("author", "Author")).await.unwrap();
    let other = repo.create_user(new_user("other", "Other")).await.unwrap();
    let blog = repo.create_blog(new_blog(author.user_id, "mine", 0)).await.unwrap();
    repo.create_blog(new_blog(other.user_id, "theirs", 0)).await.unwrap();

    assert!(repo.delete_user(author.user_id).await.unwrap());

    assert_none!(repo.get_blog_by_id(blog.blog_id).await.unwrap());
    assert_eq!(repo.get_blog_count().await.unwrap(), 1);
    assert_eq!(repo.get_blog_count_by_author(author.user_id).await.unwrap(), 0);
    assert!(!repo.delete_user(author.user_id).await.unwrap());
}

#[tokio::test]
async fn blogs_are_paged_newest_first_with_ties_broken_by_id() {
    let repo = repository().await;
    let author = repo.create_user(new_user("author", "Author")).await.unwrap();
    repo.create_blog(new_blog(author.user_id, "oldest", 0)).await.unwrap();
    let tie_first = repo.create_blog(new_blog(author.user_id, "tie one", 5)).await.unwrap();
    let tie_second = repo.create_blog(new_blog(author.user_id, "tie two", 5)).await.unwrap();
    repo.create_blog(new_blog(author.user_id, "newest", 10)).await.unwrap();

    let first_page = repo.get_blogs(PaginationFilter::new(1, 2)).await.unwrap();
    let titles: Vec<_> = first_page.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["newest", "tie two"]);
    assert!(tie_second.blog_id > tie_first.blog_id);

    let second_page = repo
        .get_blogs_by_author(author.user_id, PaginationFilter::new(2, 2))
        .await
        .unwrap();
    let titles: Vec<_> = second_page.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["tie one", "oldest"]);
}

#[tokio::test]
async fn blogs_carry_their_author_username() {
    let repo = repository().await;
    let author = repo.create_user(new_user("ursula", "Ursula")).await.unwrap();

    let created = repo.create_blog(new_blog(author.user_id, "Earthsea", 0)).await.unwrap();
    assert_eq!(created.author_username, "ursula");

    let mut edited = created.clone();
    edited.title = "A Wizard of Earthsea".into();
    let updated = repo.update_blog(edited).await.unwrap();
    assert_eq!(updated.title, "A Wizard of Earthsea");
    assert_eq!(updated.author_username, "ursula");

    let found = assert_some!(repo.get_user_by_email("ursula@example.com").await.unwrap());
    assert_eq!(found.user_id, author.user_id);
}

#[tokio::test]
async fn signup_and_posting_work_end_to_end_on_postgres() {
    let app = spawn_app_with_postgres().await;
    let author = app.sign_up(TestUser::generate()).await;

    app.post_blog(&author, "Stored for real").await;

    let body: Value = app.get("/api/blog").await.json().await.unwrap();
    assert_eq!(body["totalRecords"], 1);
    assert_eq!(body["data"][0]["title"], "Stored for real");
    assert_eq!(body["data"][0]["authorUsername"], json!(author.user.username));
}
