use chrono::Utc;

use skillshare_auth_types::token::validate_refresh_token;
use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::usecase::password::{hash_password, verify_password};
use crate::usecase::token::{TokenPair, TokenSettings, issue_and_store};

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub role: Option<UserRole>,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: TokenSettings,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<TokenPair, ApiError> {
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::EmailAlreadyExists);
        }
        if input.role.is_some_and(UserRole::is_privileged) {
            tracing::warn!(email = %input.email, "privileged role requested at registration, downgraded");
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: input.email,
            password_hash: Some(hash_password(&input.password)?),
            oauth: None,
            name: input.name,
            bio: input.bio,
            skills: input.skills,
            average_rating: 0.0,
            role: UserRole::for_registration(input.role),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        // The insert can still race another registration; the unique index decides.
        self.repo.create(&user).await?;

        issue_and_store(&self.repo, &user, &self.tokens).await
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: TokenSettings,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let Some(hash) = user.password_hash.as_deref().filter(|h| !h.is_empty()) else {
            tracing::debug!(user_id = %user.id, "password login attempted on oauth-only account");
            return Err(ApiError::InvalidCredentials);
        };
        if !verify_password(password, hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        issue_and_store(&self.repo, &user, &self.tokens).await
    }
}

// ── Refresh ──────────────────────────────────────────────────────────────────

pub struct RefreshUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: TokenSettings,
}

impl<R: UserRepository> RefreshUseCase<R> {
    /// Rotate the pair. The presented token must verify and still be the
    /// one stored for its subject.
    pub async fn execute(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let subject = validate_refresh_token(refresh_token, &self.tokens.secret).map_err(|e| {
            tracing::debug!(error = %e, "refresh token rejected");
            ApiError::InvalidRefreshToken
        })?;

        let user = self
            .repo
            .find_by_refresh_token(refresh_token)
            .await?
            .filter(|u| u.id == subject)
            .ok_or(ApiError::InvalidRefreshToken)?;

        issue_and_store(&self.repo, &user, &self.tokens).await
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> LogoutUseCase<R> {
    /// Clears the stored refresh token. Never fails the caller.
    pub async fn execute(&self, user_id: UserId) {
        if let Err(e) = self.repo.save_refresh_token(user_id, None).await {
            tracing::warn!(user_id = %user_id, error = ?e, "failed to invalidate refresh token on logout");
        }
    }
}
