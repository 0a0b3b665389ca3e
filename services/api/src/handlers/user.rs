use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use skillshare_auth_types::identity::Identity;
use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

use crate::domain::types::{ProfileUpdate, User};
use crate::error::ApiError;
use crate::handlers::{MessageResponse, validated};
use crate::state::AppState;
use crate::usecase::user::{
    ChangePasswordInput, ChangePasswordUseCase, GetUserUseCase, ListUsersUseCase,
    UpdateProfileUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Public view of an account. Credentials never leave the service.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub average_rating: f64,
    #[serde(serialize_with = "skillshare_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "skillshare_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let (oauth_provider, oauth_id) = match user.oauth {
            Some(identity) => (Some(identity.provider), Some(identity.subject)),
            None => (None, None),
        };
        Self {
            id: user.id,
            email: user.email,
            oauth_provider,
            oauth_id,
            name: user.name,
            bio: user.bio,
            skills: user.skills,
            average_rating: user.average_rating,
            created_at: user.created_at,
            updated_at: user.updated_at,
            role: user.role,
        }
    }
}

// ── GET /api/users/me ────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PUT /api/users/me ────────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(custom(function = "crate::handlers::not_blank"))]
    pub name: String,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let body = validated(body)?;
    let usecase = UpdateProfileUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            ProfileUpdate {
                name: body.name.trim().to_owned(),
                bio: body.bio,
                skills: body.skills.unwrap_or_default(),
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── PUT /api/users/me/password ───────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "must match new_password"))]
    pub confirm_password: String,
}

pub async fn change_password(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = validated(body)?;
    let usecase = ChangePasswordUseCase {
        repo: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            ChangePasswordInput {
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    _identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── GET /api/users/{id} ──────────────────────────────────────────────────────

pub async fn get_user(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(id).await?;
    Ok(Json(user.into()))
}
