//! JWT claims, signing and validation.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

/// Distinguishes access from refresh tokens; both are signed with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by an access token.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id (UUID string) |
/// | `email` | custom | account email at issuance |
/// | `role` | custom | `"user"`, `"moderator"` or `"admin"` |
/// | `typ` | custom | always `"access"` |
/// | `exp` | `exp` | seconds since epoch |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub typ: TokenKind,
    pub exp: u64,
}

/// Claims carried by a refresh token. `jti` makes every issued token unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub typ: TokenKind,
    pub jti: String,
    pub exp: u64,
}

/// Identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
    pub exp: u64,
}

/// Errors returned by token validation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("unexpected token type")]
    WrongKind,
}

// ── Core encode / decode ─────────────────────────────────────────────────

/// Sign claims with HS256.
pub fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s.
fn decode_jwt<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

fn parse_sub(sub: &str) -> Result<UserId, AuthError> {
    sub.parse::<Uuid>()
        .map(UserId)
        .map_err(|_| AuthError::Malformed)
}

// ── Public ───────────────────────────────────────────────────────────────

/// Validate a bearer access token, returning the identity it carries.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims: AccessClaims = decode_jwt(token, secret)?;
    if claims.typ != TokenKind::Access {
        return Err(AuthError::WrongKind);
    }
    Ok(TokenInfo {
        user_id: parse_sub(&claims.sub)?,
        email: claims.email,
        role: claims.role,
        exp: claims.exp,
    })
}

/// Validate a refresh token's signature, expiry and type, returning its subject.
///
/// Callers must still compare the token against the one stored for the user.
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<UserId, AuthError> {
    let claims: RefreshClaims = decode_jwt(token, secret)?;
    if claims.typ != TokenKind::Refresh {
        return Err(AuthError::WrongKind);
    }
    parse_sub(&claims.sub)
}
