use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{ProfileUpdate, User};
use crate::error::ApiError;
use crate::usecase::password::{hash_password, verify_password};

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<User, ApiError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<User>, ApiError> {
        self.repo.list_all().await
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateProfileUseCase<R> {
    pub async fn execute(&self, user_id: UserId, update: ProfileUpdate) -> Result<User, ApiError> {
        if update.name.trim().is_empty() {
            return Err(ApiError::Validation("name is required".to_owned()));
        }
        self.repo
            .update_profile(user_id, &update)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── ChangePassword ───────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ChangePasswordUseCase<R> {
    pub async fn execute(&self, user_id: UserId, input: ChangePasswordInput) -> Result<(), ApiError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let hash = user
            .password_hash
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or(ApiError::PasswordNotSet)?;
        if !verify_password(&input.current_password, hash)? {
            return Err(ApiError::WrongPassword);
        }
        let new_hash = hash_password(&input.new_password)?;
        self.repo.update_password_hash(user_id, &new_hash).await
    }
}

// ── UpdateRole (admin) ───────────────────────────────────────────────────────

pub struct UpdateRoleUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateRoleUseCase<R> {
    pub async fn execute(
        &self,
        actor: UserId,
        target: UserId,
        role: UserRole,
    ) -> Result<User, ApiError> {
        if actor == target {
            return Err(ApiError::Forbidden);
        }
        let user = self
            .repo
            .update_role(target, role)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        tracing::info!(actor = %actor, target = %target, role = %role, "user role changed");
        Ok(user)
    }
}

// ── DeleteUser (admin / moderator) ───────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, actor: UserId, target: UserId) -> Result<(), ApiError> {
        if actor == target {
            return Err(ApiError::Forbidden);
        }
        if !self.repo.delete(target).await? {
            return Err(ApiError::UserNotFound);
        }
        tracing::info!(actor = %actor, target = %target, "user deleted");
        Ok(())
    }
}
