use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::store::Store;

/// Identity established from a bearer token. The quota gate inserts it into
/// request extensions so handlers behind the gate extract it without
/// re-validating the token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| AppError::MissingToken.into_response())?;

        // Accept both "Bearer <token>" and a bare token.
        let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

        let user_id = state
            .jwt
            .verify_token(token)
            .map_err(|e| e.into_response())?;

        // The token can outlive the user row; treat that as an invalid session.
        match state.store.find_user_by_id(user_id).await {
            Ok(Some(user)) => Ok(AuthenticatedUser {
                id: user.id,
                username: user.username,
            }),
            Ok(None) => Err(AppError::UnknownUser.into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}
