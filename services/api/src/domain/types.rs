use chrono::{DateTime, Utc};
use uuid::Uuid;

use skillshare_domain::id::{FeedbackId, NotificationId, SessionId, UserId};
use skillshare_domain::notification::NotificationKind;
use skillshare_domain::user::UserRole;

/// Number of sessions returned by the recommendation endpoint.
pub const RECOMMENDED_LIMIT: u64 = 5;

/// Default and maximum page size for unread notifications.
pub const UNREAD_DEFAULT_LIMIT: u64 = 10;
pub const UNREAD_MAX_LIMIT: u64 = 50;

/// Sessions have no end time; calendar exports assume this length.
pub const SESSION_DURATION_MINUTES: i64 = 90;

/// `related_type` stored on notifications that point at a session.
pub const RELATED_SESSION: &str = "session";

/// Provider name stored in `users.oauth_provider` for Google accounts.
pub const GOOGLE_PROVIDER: &str = "google";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: Option<String>,
    pub oauth: Option<OAuthIdentity>,
    pub name: String,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub average_rating: f64,
    pub role: UserRole,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// External account a user can log in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthIdentity {
    pub provider: String,
    pub subject: String,
}

/// Profile returned by an OAuth provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub subject: String,
    pub email: String,
    pub verified_email: bool,
    pub name: String,
}

/// Profile fields a user may edit on their own account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable session fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
}

/// Search criteria for the session listing. Empty fields do not filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFilter {
    /// Whitespace-separated words; every word must match title or description.
    pub query: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub exclude_past: bool,
    pub creator_id: Option<UserId>,
}

impl Default for SessionFilter {
    fn default() -> Self {
        Self {
            query: None,
            category: None,
            location: None,
            date_from: None,
            date_to: None,
            exclude_past: true,
            creator_id: None,
        }
    }
}

impl SessionFilter {
    /// Non-empty search words, in order.
    pub fn words(&self) -> Vec<&str> {
        self.query
            .as_deref()
            .map(|q| q.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Filters for the caller's joined sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedFilter {
    pub category: Option<String>,
    pub exclude_past: bool,
}

/// Result of an attempted join, decided under a row lock on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    Full,
    AlreadyJoined,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub related_id: Option<Uuid>,
    pub related_type: Option<String>,
}

impl Notification {
    /// Unread notification about `session`.
    pub fn about_session(
        user_id: UserId,
        kind: NotificationKind,
        message: String,
        session: SessionId,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            message,
            kind,
            is_read: false,
            created_at: Utc::now(),
            related_id: Some(session.0),
            related_type: Some(RELATED_SESSION.to_owned()),
        }
    }
}

// ── Notification messages ────────────────────────────────────────────────────

pub fn new_participant_message(participant: &str, title: &str) -> String {
    format!("User '{participant}' joined your session '{title}'.")
}

pub fn session_update_message(title: &str) -> String {
    format!("Session '{title}' has been updated.")
}

/// e.g. `Reminder: Your session 'Rust 101' is starting on Mar 5, 2026 at 3:04 PM.`
pub fn reminder_message(title: &str, starts_at: DateTime<Utc>) -> String {
    format!(
        "Reminder: Your session '{title}' is starting on {}.",
        starts_at.format("%b %-d, %Y at %-I:%M %p")
    )
}
