use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Bearer-token gate: resolves to the authenticated user id or rejects
/// the request before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Err(AppError::Unauthorized("no token supplied"));
        };
        let header = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("invalid token"))?;

        // Expect "Bearer <token>"
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized("invalid token"))?
            .trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("no token supplied"));
        }

        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(reason = %e, "rejected bearer token");
            AppError::from(e)
        })?;

        Ok(AuthUser(claims.user_id))
    }
}
