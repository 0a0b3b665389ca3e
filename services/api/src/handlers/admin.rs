use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use skillshare_auth_types::identity::Identity;
use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

use crate::error::ApiError;
use crate::handlers::user::UserResponse;
use crate::handlers::{MessageResponse, require_role};
use crate::state::AppState;
use crate::usecase::user::{
    DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateRoleUseCase,
};

// ── GET /api/admin/users ─────────────────────────────────────────────────────

pub async fn list_users(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── GET /api/admin/users/{id} ────────────────────────────────────────────────

pub async fn get_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, ApiError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PUT /api/admin/users/{id}/role ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

pub async fn update_role(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = UpdateRoleUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id, id, body.role).await?;
    Ok(Json(user.into()))
}

// ── DELETE /api/admin/users/{id} ─────────────────────────────────────────────

pub async fn delete_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
