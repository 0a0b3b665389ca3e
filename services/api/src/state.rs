use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use skillshare_auth_types::identity::JwtSecret;

use crate::infra::db::{
    DbFeedbackRepository, DbNotificationRepository, DbSessionRepository, DbUserRepository,
};
use crate::infra::google::GoogleOAuthClient;
use crate::usecase::token::TokenSettings;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: TokenSettings,
    /// `None` when Google credentials are not configured.
    pub google: Option<GoogleOAuthClient>,
    pub frontend_url: String,
    pub frontend_oauth_callback_url: String,
    /// Mark the OAuth state cookie `Secure`.
    pub secure_cookies: bool,
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.tokens.secret.clone())
    }
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn feedback_repo(&self) -> DbFeedbackRepository {
        DbFeedbackRepository {
            db: self.db.clone(),
        }
    }

    pub fn notification_repo(&self) -> DbNotificationRepository {
        DbNotificationRepository {
            db: self.db.clone(),
        }
    }
}
