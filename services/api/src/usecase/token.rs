use anyhow::Context as _;
use chrono::{Duration, Utc};
use uuid::Uuid;

use skillshare_auth_types::token::{AccessClaims, RefreshClaims, TokenKind, sign};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

/// Signing key and lifetimes for issued tokens.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

fn expiry(ttl: Duration) -> u64 {
    (Utc::now() + ttl).timestamp().max(0) as u64
}

pub fn issue_access_token(user: &User, settings: &TokenSettings) -> Result<String, ApiError> {
    let claims = AccessClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        typ: TokenKind::Access,
        exp: expiry(settings.access_ttl),
    };
    Ok(sign(&claims, &settings.secret).context("sign access token")?)
}

pub fn issue_refresh_token(user: &User, settings: &TokenSettings) -> Result<String, ApiError> {
    let claims = RefreshClaims {
        sub: user.id.to_string(),
        typ: TokenKind::Refresh,
        jti: Uuid::new_v4().to_string(),
        exp: expiry(settings.refresh_ttl),
    };
    Ok(sign(&claims, &settings.secret).context("sign refresh token")?)
}

pub fn issue_token_pair(user: &User, settings: &TokenSettings) -> Result<TokenPair, ApiError> {
    Ok(TokenPair {
        access_token: issue_access_token(user, settings)?,
        refresh_token: issue_refresh_token(user, settings)?,
        expires_in: settings.access_ttl.num_seconds(),
    })
}

/// Mint a pair and store its refresh token, replacing any previous one.
pub async fn issue_and_store<R: UserRepository>(
    repo: &R,
    user: &User,
    settings: &TokenSettings,
) -> Result<TokenPair, ApiError> {
    let pair = issue_token_pair(user, settings)?;
    repo.save_refresh_token(user.id, Some(&pair.refresh_token))
        .await?;
    Ok(pair)
}
