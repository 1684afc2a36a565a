//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService};
use crate::infrastructure::persistence::{PgLinkRepository, PgUserRepository};

/// Handler-visible application state.
///
/// Services are stateless behind `Arc`s; the connection pool inside the
/// repositories is the only shared resource.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<PgLinkRepository>>,
    pub auth_service: Arc<AuthService<PgUserRepository>>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<PgLinkRepository>>,
        auth_service: Arc<AuthService<PgUserRepository>>,
    ) -> Self {
        Self {
            link_service,
            auth_service,
        }
    }
}
