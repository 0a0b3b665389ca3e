use chrono::Utc;

use skillshare_domain::id::UserId;
use skillshare_domain::user::UserRole;

use crate::domain::repository::{OAuthProvider, UserRepository};
use crate::domain::types::{OAuthIdentity, OAuthProfile, User};
use crate::error::ApiError;
use crate::usecase::token::{TokenPair, TokenSettings, issue_token_pair};

/// What to do with an existing account found by email during OAuth login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    /// Already linked to this exact identity.
    AlreadyLinked,
    /// No external identity yet; attach this one.
    Link,
}

/// An account may carry at most one external identity.
pub fn decide_link(user: &User, identity: &OAuthIdentity) -> Result<LinkDecision, ApiError> {
    match &user.oauth {
        None => Ok(LinkDecision::Link),
        Some(existing) if existing == identity => Ok(LinkDecision::AlreadyLinked),
        Some(existing) => {
            tracing::warn!(
                user_id = %user.id,
                linked_provider = %existing.provider,
                provider = %identity.provider,
                "refusing to link a second oauth identity"
            );
            Err(ApiError::OAuthAccountConflict)
        }
    }
}

// ── OAuthLogin ───────────────────────────────────────────────────────────────

pub struct OAuthLoginUseCase<R: UserRepository, P: OAuthProvider> {
    pub repo: R,
    pub provider: P,
    pub tokens: TokenSettings,
}

impl<R: UserRepository, P: OAuthProvider> OAuthLoginUseCase<R, P> {
    pub async fn execute(&self, code: &str) -> Result<TokenPair, ApiError> {
        if code.is_empty() {
            return Err(ApiError::Validation("authorization code is required".to_owned()));
        }
        let profile = self.provider.exchange_code(code).await?;
        if !profile.verified_email {
            tracing::warn!(email = %profile.email, "oauth login with unverified email");
            return Err(ApiError::EmailNotVerified);
        }

        let user = self.resolve_user(profile).await?;
        let pair = issue_token_pair(&user, &self.tokens)?;
        if let Err(e) = self
            .repo
            .save_refresh_token(user.id, Some(&pair.refresh_token))
            .await
        {
            tracing::warn!(user_id = %user.id, error = ?e, "failed to store refresh token after oauth login");
        }
        Ok(pair)
    }

    /// Find by external identity, then by email (linking it), else create.
    async fn resolve_user(&self, profile: OAuthProfile) -> Result<User, ApiError> {
        let identity = OAuthIdentity {
            provider: self.provider.name().to_owned(),
            subject: profile.subject,
        };

        if let Some(user) = self.repo.find_by_oauth(&identity).await? {
            return Ok(user);
        }

        if let Some(mut user) = self.repo.find_by_email(&profile.email).await? {
            if decide_link(&user, &identity)? == LinkDecision::Link {
                self.repo.link_oauth(user.id, &identity).await?;
                tracing::info!(user_id = %user.id, provider = %identity.provider, "linked oauth identity");
                user.oauth = Some(identity);
            }
            return Ok(user);
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: profile.email,
            password_hash: None,
            oauth: Some(identity),
            name: profile.name,
            bio: None,
            skills: Vec::new(),
            average_rating: 0.0,
            role: UserRole::User,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, "created user from oauth profile");
        Ok(user)
    }
}
