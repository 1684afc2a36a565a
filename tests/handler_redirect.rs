mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use sqlx::PgPool;
use shortly::api::handlers::redirect_handler;

fn app(state: shortly::AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state)
}

#[sqlx::test]
async fn test_redirect_success(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = TestServer::new(app(state)).unwrap();

    common::create_test_link(&pool, "xY3kAz7", "https://example.com/a/b/c", None).await;

    let response = server.get("/xY3kAz7").await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/a/b/c");
}

#[sqlx::test]
async fn test_redirect_counts_click(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = TestServer::new(app(state)).unwrap();

    common::create_test_link(&pool, "clickme1", "https://example.com", None).await;

    server.get("/clickme1").await;
    assert_eq!(common::link_clicks(&pool, "clickme1").await, 1);

    server.get("/clickme1").await;
    server.get("/clickme1").await;
    assert_eq!(common::link_clicks(&pool, "clickme1").await, 3);
}

#[sqlx::test]
async fn test_redirect_unknown_code_is_plain_404(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = TestServer::new(app(state)).unwrap();

    let response = server.get("/doesNotExist").await;

    response.assert_status_not_found();
    // Plain body, not the JSON error envelope.
    assert_eq!(response.text(), "Not Found");
}

#[sqlx::test]
async fn test_redirect_unknown_code_mutates_nothing(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let server = TestServer::new(app(state)).unwrap();

    common::create_test_link(&pool, "bystander", "https://example.com", None).await;

    server.get("/doesNotExist").await;

    assert_eq!(common::link_clicks(&pool, "bystander").await, 0);
}
