//! Mock auth helpers for router tests.
//!
//! Authenticated routes validate `Authorization: Bearer <jwt>`. `MockAuth`
//! signs a real access token for a chosen identity so tests exercise the same
//! extractor path as production traffic.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};

use skillshare_auth_types::token::{AccessClaims, TokenKind, sign};
use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            email: format!("{user_id}@example.com"),
            role,
        }
    }

    pub fn user() -> Self {
        Self::new(UserId::new(), UserRole::User)
    }

    pub fn admin() -> Self {
        Self::new(UserId::new(), UserRole::Admin)
    }

    /// Signed access token valid for one hour.
    pub fn token(&self, secret: &str) -> String {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        sign(
            &AccessClaims {
                sub: self.user_id.to_string(),
                email: self.email.clone(),
                role: self.role,
                typ: TokenKind::Access,
                exp,
            },
            secret,
        )
        .unwrap()
    }

    /// `Authorization` header pair, ready for `TestServer` requests.
    pub fn header(&self, secret: &str) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token(secret))).unwrap();
        (AUTHORIZATION, value)
    }
}
