use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Skillshare API error variants. Each maps to exactly one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("cannot join your own session")]
    CannotJoinOwnSession,
    #[error("no password is set for this account")]
    PasswordNotSet,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid or expired refresh token")]
    InvalidRefreshToken,
    #[error("current password is incorrect")]
    WrongPassword,
    #[error("invalid oauth state")]
    InvalidOAuthState,
    #[error("forbidden")]
    Forbidden,
    #[error("email address is not verified")]
    EmailNotVerified,
    #[error("user not found")]
    UserNotFound,
    #[error("session not found")]
    SessionNotFound,
    #[error("notification not found")]
    NotificationNotFound,
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("already joined this session")]
    AlreadyJoined,
    #[error("not joined this session")]
    NotJoined,
    #[error("session is full")]
    SessionFull,
    #[error("feedback already submitted for this session")]
    FeedbackAlreadyExists,
    #[error("account is already linked to a different oauth identity")]
    OAuthAccountConflict,
    #[error("oauth is not configured")]
    OAuthUnavailable,
    #[error("oauth provider request failed")]
    OAuthExchange(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::CannotJoinOwnSession => "CANNOT_JOIN_OWN_SESSION",
            Self::PasswordNotSet => "PASSWORD_NOT_SET",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::InvalidOAuthState => "INVALID_OAUTH_STATE",
            Self::Forbidden => "FORBIDDEN",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::NotJoined => "NOT_JOINED",
            Self::SessionFull => "SESSION_FULL",
            Self::FeedbackAlreadyExists => "FEEDBACK_ALREADY_EXISTS",
            Self::OAuthAccountConflict => "OAUTH_ACCOUNT_CONFLICT",
            Self::OAuthUnavailable => "OAUTH_UNAVAILABLE",
            Self::OAuthExchange(_) => "OAUTH_EXCHANGE_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::CannotJoinOwnSession | Self::PasswordNotSet => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials
            | Self::InvalidRefreshToken
            | Self::WrongPassword
            | Self::InvalidOAuthState => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::EmailNotVerified => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::SessionNotFound | Self::NotificationNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::EmailAlreadyExists
            | Self::AlreadyJoined
            | Self::NotJoined
            | Self::SessionFull
            | Self::FeedbackAlreadyExists
            | Self::OAuthAccountConflict => StatusCode::CONFLICT,
            Self::OAuthUnavailable | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OAuthExchange(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_owned());
                format!("{field} {reason}")
            })
            .collect();
        fields.sort();
        Self::Validation(fields.join(", "))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            }
            Self::OAuthExchange(e) => {
                tracing::error!(error = ?e, kind = "OAUTH_EXCHANGE_FAILED", "oauth provider error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
