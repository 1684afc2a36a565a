#![allow(dead_code)]

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
use sqlx::PgPool;
use std::sync::Arc;

use shortly::application::services::{AuthService, LinkService};
use shortly::infrastructure::persistence::{PgLinkRepository, PgUserRepository};
use shortly::state::AppState;

pub const BASE_URL: &str = "http://host";

pub fn create_test_state(pool: PgPool) -> AppState {
    let pool = Arc::new(pool);

    let link_repo = Arc::new(PgLinkRepository::new(pool.clone()));
    let user_repo = Arc::new(PgUserRepository::new(pool));

    let link_service = Arc::new(LinkService::new(link_repo, BASE_URL.to_string()));
    let auth_service = Arc::new(AuthService::new(
        user_repo,
        "test-signing-secret".to_string(),
        3600,
    ));

    AppState::new(link_service, auth_service)
}

pub async fn create_test_user(pool: &PgPool, email: &str, password: &str) -> i64 {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();

    sqlx::query_scalar("INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id")
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_link(pool: &PgPool, code: &str, url: &str, owner_id: Option<i64>) {
    sqlx::query("INSERT INTO links (code, target_url, owner_id) VALUES ($1, $2, $3)")
        .bind(code)
        .bind(url)
        .bind(owner_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn link_clicks(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM links WHERE code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Opens a session for the user and returns the cookie header value.
pub async fn session_cookie(state: &AppState, email: &str, password: &str) -> String {
    let (_, token) = state.auth_service.login(email, password).await.unwrap();
    format!("session={token}")
}
