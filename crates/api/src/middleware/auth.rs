//! Authentication middleware for protected routes.
//!
//! The session token travels as an HTTP-only cookie; validation fails
//! closed on any parse, signature, or expiry problem.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::AppState;
use crate::cookies::SESSION_COOKIE;
use riderledger_shared::{Claims, JwtError};

/// Authentication middleware that validates the session cookie.
///
/// On success the decoded claims are stored in request extensions for
/// handlers to access through [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "missing_token",
                "message": "Not authorized - Please login first"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(cookie.value()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                JwtError::Expired => ("token_expired", "Session expired - Please login again"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "error": error,
                    "message": message
                })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated user's claims.
///
/// Use this in handlers behind the auth middleware:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "success": false,
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}
