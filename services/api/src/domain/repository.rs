#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use skillshare_domain::id::{NotificationId, SessionId, UserId};
use skillshare_domain::pagination::PageRequest;
use skillshare_domain::user::UserRole;

use crate::domain::types::{
    Feedback, JoinOutcome, JoinedFilter, Notification, OAuthIdentity, OAuthProfile,
    ProfileUpdate, Session, SessionDraft, SessionFilter, User,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    async fn find_by_oauth(&self, identity: &OAuthIdentity) -> Result<Option<User>, ApiError>;

    /// User whose stored refresh token equals `token` exactly.
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, ApiError>;

    /// All users, newest first.
    async fn list_all(&self) -> Result<Vec<User>, ApiError>;

    /// Insert a new user. `EmailAlreadyExists` on a duplicate email.
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Replace name, bio and skills. Returns the updated user, `None` if absent.
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, ApiError>;

    async fn update_password_hash(&self, id: UserId, hash: &str) -> Result<(), ApiError>;

    /// Returns the updated user, `None` if absent.
    async fn update_role(&self, id: UserId, role: UserRole) -> Result<Option<User>, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, ApiError>;

    /// Overwrite (or clear with `None`) the single stored refresh token.
    async fn save_refresh_token(&self, id: UserId, token: Option<&str>) -> Result<(), ApiError>;

    /// Attach an external identity to an existing account.
    async fn link_oauth(&self, id: UserId, identity: &OAuthIdentity) -> Result<(), ApiError>;
}

/// Repository for sessions and their participants.
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, ApiError>;

    async fn create(&self, session: &Session) -> Result<(), ApiError>;

    /// Returns the updated session, `None` if absent.
    async fn update(
        &self,
        id: SessionId,
        draft: &SessionDraft,
    ) -> Result<Option<Session>, ApiError>;

    /// Returns `true` if a row was deleted. Participation rows cascade.
    async fn delete(&self, id: SessionId) -> Result<bool, ApiError>;

    /// One page of matching sessions plus the total match count.
    async fn search(
        &self,
        filter: &SessionFilter,
        page: PageRequest,
    ) -> Result<(Vec<Session>, u64), ApiError>;

    /// Sessions `user_id` participates in, latest first.
    async fn list_joined(
        &self,
        user_id: UserId,
        filter: &JoinedFilter,
        page: PageRequest,
    ) -> Result<(Vec<Session>, u64), ApiError>;

    /// Upcoming sessions not created or joined by `user_id`. With `skills`,
    /// only matching categories (soonest first); without, newest created first.
    async fn recommended_for_user(
        &self,
        user_id: UserId,
        skills: &[String],
        limit: u64,
    ) -> Result<Vec<Session>, ApiError>;

    /// Soonest upcoming sessions, no exclusions.
    async fn recommended(&self, limit: u64) -> Result<Vec<Session>, ApiError>;

    /// Sessions with `from < date_time <= to`, soonest first.
    async fn starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>, ApiError>;

    async fn participants(&self, id: SessionId) -> Result<Vec<User>, ApiError>;

    async fn count_participants(&self, id: SessionId) -> Result<u64, ApiError>;

    async fn is_participant(&self, id: SessionId, user_id: UserId) -> Result<bool, ApiError>;

    /// Capacity check and insert, atomically.
    async fn join(&self, id: SessionId, user_id: UserId) -> Result<JoinOutcome, ApiError>;

    /// Returns `false` if the user was not a participant.
    async fn leave(&self, id: SessionId, user_id: UserId) -> Result<bool, ApiError>;
}

/// Repository for session feedback.
pub trait FeedbackRepository: Send + Sync {
    /// Insert feedback and refresh the session creator's average rating.
    /// `FeedbackAlreadyExists` on a duplicate (session, user) pair.
    async fn create(&self, feedback: &Feedback) -> Result<(), ApiError>;

    /// Newest first.
    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Feedback>, ApiError>;
}

/// Repository for per-user notifications.
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<(), ApiError>;

    /// Most recent unread notifications, newest first.
    async fn list_unread(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<Notification>, ApiError>;

    /// Returns `false` unless `id` exists and belongs to `user_id`.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<bool, ApiError>;

    /// Returns the number of notifications flipped.
    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, ApiError>;

    /// `true` if a reminder for this session was already sent to the user.
    async fn has_reminder(&self, user_id: UserId, session_id: SessionId) -> Result<bool, ApiError>;
}

/// External OAuth identity provider.
pub trait OAuthProvider: Send + Sync {
    /// Provider name stored alongside the external subject.
    fn name(&self) -> &'static str;

    /// Consent page URL carrying `state`.
    fn authorize_url(&self, state: &str) -> Result<String, ApiError>;

    /// Exchange an authorization code for the user's profile.
    async fn exchange_code(&self, code: &str) -> Result<OAuthProfile, ApiError>;
}
