//! Link creation and resolution service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;
use serde_json::json;

/// Attempts at generating a non-colliding code before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Business rules for creating and resolving short links.
///
/// The store's unique index is the only collision arbiter: creation inserts
/// directly and reacts to the reported conflict, rather than checking first
/// and racing a concurrent insert.
pub struct LinkService<R: LinkRepository> {
    repository: Arc<R>,
    base_url: String,
}

impl<R: LinkRepository> LinkService<R> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are composed from.
    pub fn new(repository: Arc<R>, base_url: String) -> Self {
        Self {
            repository,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link for a target URL.
    ///
    /// The target is validated and normalized first. A caller-chosen
    /// `custom_code` requires an authenticated owner; without one, a fresh
    /// code is generated and the insert retried on the (vanishingly rare)
    /// collision, up to [`MAX_GENERATION_ATTEMPTS`] times.
    ///
    /// Repeated creation for the same target deliberately yields distinct
    /// codes; there is no deduplication by URL.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - malformed target URL or custom code
    /// - [`AppError::Unauthorized`] - custom code without an owner
    /// - [`AppError::Conflict`] - custom code already taken
    /// - [`AppError::Internal`] - retry budget exhausted or storage failure
    pub async fn create_link(
        &self,
        target_url: String,
        custom_code: Option<String>,
        owner_id: Option<i64>,
    ) -> Result<Link, AppError> {
        let target_url = normalize_url(&target_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        match custom_code {
            Some(code) => {
                if owner_id.is_none() {
                    return Err(AppError::unauthorized(
                        "Custom codes require an authenticated user",
                        json!({ "code": code }),
                    ));
                }

                validate_custom_code(&code)?;

                self.repository
                    .insert(NewLink {
                        code: code.clone(),
                        target_url,
                        owner_id,
                    })
                    .await
                    .map_err(|e| match e {
                        AppError::Conflict { .. } => AppError::conflict(
                            "Custom code already taken",
                            json!({ "code": code }),
                        ),
                        other => other,
                    })
            }
            None => self.insert_with_generated_code(target_url, owner_id).await,
        }
    }

    /// Resolves a short code to its link and counts the click.
    ///
    /// The click counter is incremented atomically at the storage layer
    /// before the link is returned; the record reflects the new count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code, including the
    /// case where the record vanishes between lookup and increment.
    pub async fn resolve_link(&self, code: &str) -> Result<Link, AppError> {
        if self.repository.find_by_code(code).await?.is_none() {
            return Err(Self::unknown_code(code));
        }

        self.repository
            .increment_clicks(code)
            .await?
            .ok_or_else(|| Self::unknown_code(code))
    }

    /// Retrieves a link by code without counting a click.
    ///
    /// Used by the QR endpoints, where rendering an image is not a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code.
    pub async fn peek_link(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| Self::unknown_code(code))
    }

    /// Lists all links owned by a user, most recent first.
    pub async fn links_for_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        self.repository.find_all_by_owner(owner_id).await
    }

    /// Deletes a link owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no link matches the code and
    /// owner. Links owned by someone else are indistinguishable from absent
    /// ones.
    pub async fn delete_link(&self, code: &str, owner_id: i64) -> Result<(), AppError> {
        if self.repository.delete_owned(code, owner_id).await? {
            Ok(())
        } else {
            Err(Self::unknown_code(code))
        }
    }

    /// Counts stored links. Doubles as the health check's database probe.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Composes the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    async fn insert_with_generated_code(
        &self,
        target_url: String,
        owner_id: Option<i64>,
    ) -> Result<Link, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let result = self
                .repository
                .insert(NewLink {
                    code: generate_code(),
                    target_url: target_url.clone(),
                    owner_id,
                })
                .await;

            match result {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }

    fn unknown_code(code: &str) -> AppError {
        AppError::not_found("Short link not found", json!({ "code": code }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn service(repo: MockLinkRepository) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(repo), "http://host".to_string())
    }

    fn test_link(id: i64, code: &str, url: &str, clicks: i64) -> Link {
        Link::new(id, code.to_string(), url.to_string(), None, clicks, Utc::now())
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .withf(|new_link| {
                new_link.code.len() == 7 && new_link.target_url == "https://example.com/"
            })
            .times(1)
            .returning(|new_link| {
                Ok(Link::new(
                    1,
                    new_link.code,
                    new_link.target_url,
                    new_link.owner_id,
                    0,
                    Utc::now(),
                ))
            });

        let result = service(repo)
            .create_link("https://example.com".to_string(), None, None)
            .await;

        let link = result.unwrap();
        assert_eq!(link.target_url, "https://example.com/");
        assert_eq!(link.clicks, 0);
    }

    #[tokio::test]
    async fn test_create_link_invalid_url() {
        let repo = MockLinkRepository::new();

        let result = service(repo)
            .create_link("not a url".to_string(), None, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_link_retries_on_collision() {
        let mut repo = MockLinkRepository::new();
        let mut calls = 0;
        repo.expect_insert().times(3).returning(move |new_link| {
            calls += 1;
            if calls < 3 {
                Err(AppError::conflict("dup", serde_json::json!({})))
            } else {
                Ok(Link::new(
                    1,
                    new_link.code,
                    new_link.target_url,
                    None,
                    0,
                    Utc::now(),
                ))
            }
        });

        let result = service(repo)
            .create_link("https://example.com".to_string(), None, None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_generation_exhausted() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("dup", serde_json::json!({}))));

        let result = service(repo)
            .create_link("https://example.com".to_string(), None, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_link_custom_code_requires_owner() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(0);

        let result = service(repo)
            .create_link(
                "https://example.com".to_string(),
                Some("promo".to_string()),
                None,
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_create_link_with_custom_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .withf(|new_link| new_link.code == "promo" && new_link.owner_id == Some(7))
            .times(1)
            .returning(|new_link| {
                Ok(Link::new(
                    1,
                    new_link.code,
                    new_link.target_url,
                    new_link.owner_id,
                    0,
                    Utc::now(),
                ))
            });

        let result = service(repo)
            .create_link(
                "https://example.com".to_string(),
                Some("promo".to_string()),
                Some(7),
            )
            .await;

        assert_eq!(result.unwrap().code, "promo");
    }

    #[tokio::test]
    async fn test_create_link_custom_code_taken() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(AppError::conflict("dup", serde_json::json!({}))));

        let result = service(repo)
            .create_link(
                "https://example.com".to_string(),
                Some("promo".to_string()),
                Some(7),
            )
            .await;

        // A custom-code collision is surfaced, never retried.
        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_link_invalid_custom_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(0);

        let result = service(repo)
            .create_link(
                "https://example.com".to_string(),
                Some("a!".to_string()),
                Some(7),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_resolve_link_increments_clicks() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|code| Ok(Some(test_link(1, code, "https://example.com", 0))));
        repo.expect_increment_clicks()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|code| Ok(Some(test_link(1, code, "https://example.com", 1))));

        let link = service(repo).resolve_link("abc1234").await.unwrap();

        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.clicks, 1);
    }

    #[tokio::test]
    async fn test_resolve_link_unknown_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_increment_clicks().times(0);

        let result = service(repo).resolve_link("missing").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_link_deleted_between_lookup_and_increment() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(test_link(1, code, "https://example.com", 0))));
        repo.expect_increment_clicks().times(1).returning(|_| Ok(None));

        let result = service(repo).resolve_link("gone123").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_peek_link_does_not_count_click() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(test_link(1, code, "https://example.com", 5))));
        repo.expect_increment_clicks().times(0);

        let link = service(repo).peek_link("abc1234").await.unwrap();

        assert_eq!(link.clicks, 5);
    }

    #[tokio::test]
    async fn test_delete_link_not_owned() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_owned()
            .times(1)
            .returning(|_, _| Ok(false));

        let result = service(repo).delete_link("abc1234", 7).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[test]
    fn test_short_url_composition() {
        let repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(repo), "http://host/".to_string());

        assert_eq!(service.short_url("xY3kAz7"), "http://host/xY3kAz7");
    }
}
