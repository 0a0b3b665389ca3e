use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use skillshare_auth_types::identity::Identity;
use skillshare_domain::user::UserRole;

use crate::error::ApiError;
use crate::handlers::{MessageResponse, validated};
use crate::state::AppState;
use crate::usecase::auth::{
    LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
};
use crate::usecase::token::TokenPair;

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
        }
    }
}

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = "crate::handlers::not_blank"))]
    pub name: String,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub role: Option<UserRole>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let body = validated(body)?;
    let usecase = RegisterUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let pair = usecase
        .execute(RegisterInput {
            email: body.email.trim().to_owned(),
            password: body.password,
            name: body.name.trim().to_owned(),
            bio: body.bio,
            skills: body.skills.unwrap_or_default(),
            role: body.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(pair.into())))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let body = validated(body)?;
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let pair = usecase.execute(body.email.trim(), &body.password).await?;
    Ok(Json(pair.into()))
}

// ── POST /auth/refresh ───────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub refresh_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let body = validated(body)?;
    let usecase = RefreshUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let pair = usecase.execute(&body.refresh_token).await?;
    Ok(Json(pair.into()))
}

// ── POST /api/logout ─────────────────────────────────────────────────────────

pub async fn logout(identity: Identity, State(state): State<AppState>) -> Json<MessageResponse> {
    let usecase = LogoutUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(identity.user_id).await;
    Json(MessageResponse::new("Successfully logged out"))
}
