mod common;

use sqlx::PgPool;
use std::sync::Arc;

use shortly::AppError;
use shortly::domain::entities::NewLink;
use shortly::domain::repositories::LinkRepository;
use shortly::infrastructure::persistence::PgLinkRepository;

fn repo(pool: PgPool) -> PgLinkRepository {
    PgLinkRepository::new(Arc::new(pool))
}

fn new_link(code: &str, url: &str, owner_id: Option<i64>) -> NewLink {
    NewLink {
        code: code.to_string(),
        target_url: url.to_string(),
        owner_id,
    }
}

#[sqlx::test]
async fn test_insert_and_find(pool: PgPool) {
    let repo = repo(pool);

    let created = repo
        .insert(new_link("abc1234", "https://example.com", None))
        .await
        .unwrap();
    assert_eq!(created.code, "abc1234");
    assert_eq!(created.clicks, 0);

    let found = repo.find_by_code("abc1234").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.target_url, "https://example.com");
}

#[sqlx::test]
async fn test_insert_duplicate_code_is_conflict(pool: PgPool) {
    let repo = repo(pool);

    repo.insert(new_link("dup1234", "https://one.example.com", None))
        .await
        .unwrap();

    let result = repo
        .insert(new_link("dup1234", "https://two.example.com", None))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
}

#[sqlx::test]
async fn test_find_unknown_code(pool: PgPool) {
    let repo = repo(pool);

    assert!(repo.find_by_code("missing").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_increment_clicks_returns_updated_link(pool: PgPool) {
    let repo = repo(pool);
    repo.insert(new_link("clicks1", "https://example.com", None))
        .await
        .unwrap();

    let updated = repo.increment_clicks("clicks1").await.unwrap().unwrap();
    assert_eq!(updated.clicks, 1);

    let updated = repo.increment_clicks("clicks1").await.unwrap().unwrap();
    assert_eq!(updated.clicks, 2);
}

#[sqlx::test]
async fn test_increment_clicks_unknown_code(pool: PgPool) {
    let repo = repo(pool);

    assert!(repo.increment_clicks("missing").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_concurrent_increments_lose_nothing(pool: PgPool) {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    repo.insert(new_link("racing1", "https://example.com", None))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.increment_clicks("racing1").await.unwrap().unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let link = repo.find_by_code("racing1").await.unwrap().unwrap();
    assert_eq!(link.clicks, 20);
}

#[sqlx::test]
async fn test_find_all_by_owner_ordering(pool: PgPool) {
    let owner = common::create_test_user(&pool, "owner@example.com", "hunter22").await;
    let repo = repo(pool.clone());

    repo.insert(new_link("first01", "https://example.com/1", Some(owner)))
        .await
        .unwrap();
    sqlx::query("UPDATE links SET created_at = created_at - INTERVAL '1 day' WHERE code = 'first01'")
        .execute(&pool)
        .await
        .unwrap();
    repo.insert(new_link("second1", "https://example.com/2", Some(owner)))
        .await
        .unwrap();
    repo.insert(new_link("anon001", "https://example.com/3", None))
        .await
        .unwrap();

    let links = repo.find_all_by_owner(owner).await.unwrap();

    let codes: Vec<&str> = links.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["second1", "first01"]);
}

#[sqlx::test]
async fn test_delete_owned_scoping(pool: PgPool) {
    let owner = common::create_test_user(&pool, "owner@example.com", "hunter22").await;
    let other = common::create_test_user(&pool, "other@example.com", "hunter22").await;
    let repo = repo(pool);

    repo.insert(new_link("mine001", "https://example.com", Some(owner)))
        .await
        .unwrap();

    assert!(!repo.delete_owned("mine001", other).await.unwrap());
    assert!(repo.delete_owned("mine001", owner).await.unwrap());
    assert!(repo.find_by_code("mine001").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_count(pool: PgPool) {
    let repo = repo(pool);

    assert_eq!(repo.count().await.unwrap(), 0);

    repo.insert(new_link("one0001", "https://example.com", None))
        .await
        .unwrap();
    repo.insert(new_link("two0001", "https://example.com", None))
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
}
