//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::response::{IntoResponse, Response};
use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use http::request::Parts;
use http::{HeaderMap, StatusCode};

use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

use crate::token::{AuthError, validate_access_token};

/// HMAC secret used to validate access tokens. Provide it from the router
/// state with `impl FromRef<AppState> for JwtSecret`.
#[derive(Debug, Clone)]
pub struct JwtSecret(pub String);

/// Caller identity decoded from `Authorization: Bearer <access token>`.
///
/// Rejects with 401 when the header is absent, not a bearer header, or the
/// token fails validation. Use `Option<Identity>` on routes that also serve
/// anonymous callers: a missing header yields `None`, a bad one still 401s.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl Identity {
    /// `true` when the caller's role ranks at or above `required`.
    pub fn has_role(&self, required: UserRole) -> bool {
        self.role >= required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("authorization header is required")]
    MissingHeader,
    #[error("authorization header format must be Bearer <token>")]
    InvalidHeader,
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    InvalidToken,
}

impl AuthRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingHeader => "MISSING_TOKEN",
            Self::InvalidHeader => "INVALID_AUTHORIZATION_HEADER",
            Self::Expired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (
            StatusCode::UNAUTHORIZED,
            [(WWW_AUTHENTICATE, "Bearer")],
            axum::Json(body),
        )
            .into_response()
    }
}

/// `Ok(None)` when no `Authorization` header is present.
fn authenticate(headers: &HeaderMap, secret: &JwtSecret) -> Result<Option<Identity>, AuthRejection> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthRejection::InvalidHeader)?;
    let token = match value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => token,
        _ => return Err(AuthRejection::InvalidHeader),
    };

    let info = validate_access_token(token, &secret.0).map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        match e {
            AuthError::Expired => AuthRejection::Expired,
            _ => AuthRejection::InvalidToken,
        }
    })?;

    Ok(Some(Identity {
        user_id: info.user_id,
        email: info.email,
        role: info.role,
    }))
}

impl<S> FromRequestParts<S> for Identity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    // Validate synchronously, then hand back a 'static future (axum-core 0.5
    // declares this as `fn -> impl Future + Send`).
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = authenticate(&parts.headers, &JwtSecret::from_ref(state))
            .and_then(|identity| identity.ok_or(AuthRejection::MissingHeader));
        async move { result }
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let result = authenticate(&parts.headers, &JwtSecret::from_ref(state));
        async move { result }
    }
}
