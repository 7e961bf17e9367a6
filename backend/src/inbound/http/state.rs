//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DashboardQuery, FeedbackCommand, FeedbackQuery, IdentityService, TeamQuery,
};
use crate::domain::{AuthContext, Error};
use crate::inbound::http::bearer::BearerToken;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityService>,
    pub team: Arc<dyn TeamQuery>,
    pub feedback: Arc<dyn FeedbackCommand>,
    pub feedback_query: Arc<dyn FeedbackQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
}

impl HttpState {
    /// Exchange a bearer token for the caller's authenticated context.
    pub async fn authenticate(&self, bearer: &BearerToken) -> Result<AuthContext, Error> {
        self.identity.authenticate(bearer.token()).await
    }
}
