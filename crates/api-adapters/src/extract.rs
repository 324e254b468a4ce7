//! Bearer-token extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::{Caller, DomainError, User};
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller, resolved from `Authorization: Bearer <token>`.
///
/// Handlers that take this argument reject anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub caller: Caller,
    pub user: User,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::authentication("Authentication required"))?;

        let (caller, user) = state.services.auth.authenticate(token).await.map_err(|e| {
            warn!(error = %e, "bearer authentication rejected");
            e
        })?;
        Ok(CurrentUser { caller, user })
    }
}
