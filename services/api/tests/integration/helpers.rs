#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use skillshare_api::domain::repository::{
    FeedbackRepository, NotificationRepository, OAuthProvider, SessionRepository, UserRepository,
};
use skillshare_api::domain::types::{
    Feedback, JoinOutcome, JoinedFilter, Notification, OAuthIdentity, OAuthProfile,
    ProfileUpdate, Session, SessionDraft, SessionFilter, User,
};
use skillshare_api::error::ApiError;
use skillshare_api::usecase::password::hash_password;
use skillshare_api::usecase::token::TokenSettings;
use skillshare_domain::id::{NotificationId, SessionId, UserId};
use skillshare_domain::notification::NotificationKind;
use skillshare_domain::pagination::PageRequest;
use skillshare_domain::user::UserRole;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "correct horse";

pub fn token_settings() -> TokenSettings {
    TokenSettings {
        secret: TEST_JWT_SECRET.to_owned(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::hours(168),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(name: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: Some(hash_password(TEST_PASSWORD).unwrap()),
        oauth: None,
        name: name.to_owned(),
        bio: None,
        skills: Vec::new(),
        average_rating: 0.0,
        role: UserRole::User,
        refresh_token: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_session(creator: UserId, title: &str, starts_in: Duration) -> Session {
    let now = Utc::now();
    Session {
        id: SessionId::new(),
        title: title.to_owned(),
        description: format!("All about {title}"),
        category: "programming".to_owned(),
        date_time: now + starts_in,
        location: "Berlin".to_owned(),
        max_participants: 10,
        creator_id: creator,
        created_at: now,
        updated_at: now,
    }
}

pub fn draft(title: &str, starts_in: Duration) -> SessionDraft {
    SessionDraft {
        title: title.to_owned(),
        description: "desc".to_owned(),
        category: "programming".to_owned(),
        date_time: Utc::now() + starts_in,
        location: "Online".to_owned(),
        max_participants: 5,
    }
}

// ── MockDb ───────────────────────────────────────────────────────────────────

/// In-memory tables shared by every mock repository built from it.
#[derive(Clone, Default)]
pub struct MockDb {
    pub users: Arc<Mutex<Vec<User>>>,
    pub sessions: Arc<Mutex<Vec<Session>>>,
    pub participants: Arc<Mutex<Vec<(SessionId, UserId)>>>,
    pub feedback: Arc<Mutex<Vec<Feedback>>>,
    pub notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let db = Self::new();
        *db.users.lock().unwrap() = users;
        db
    }

    pub fn add_session(&self, session: Session) {
        self.sessions.lock().unwrap().push(session);
    }

    pub fn add_participant(&self, session: SessionId, user: UserId) {
        self.participants.lock().unwrap().push((session, user));
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn session(&self, id: SessionId) -> Option<Session> {
        self.sessions.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }

    pub fn notifications_for(&self, user: UserId) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect()
    }

    pub fn user_repo(&self) -> MockUserRepo {
        MockUserRepo { db: self.clone() }
    }

    pub fn session_repo(&self) -> MockSessionRepo {
        MockSessionRepo { db: self.clone() }
    }

    pub fn feedback_repo(&self) -> MockFeedbackRepo {
        MockFeedbackRepo { db: self.clone() }
    }

    pub fn notification_repo(&self) -> MockNotificationRepo {
        MockNotificationRepo {
            db: self.clone(),
            fail: false,
        }
    }

    /// Notification repo whose every call fails.
    pub fn broken_notification_repo(&self) -> MockNotificationRepo {
        MockNotificationRepo {
            db: self.clone(),
            fail: true,
        }
    }
}

fn page_of(mut items: Vec<Session>, page: PageRequest) -> (Vec<Session>, u64) {
    let total = items.len() as u64;
    let data = items
        .drain(..)
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    (data, total)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub db: MockDb,
}

impl MockUserRepo {
    fn with_user<T>(&self, id: UserId, f: impl FnOnce(&mut User) -> T) -> Option<T> {
        let mut users = self.db.users.lock().unwrap();
        users.iter_mut().find(|u| u.id == id).map(|u| {
            let out = f(u);
            u.updated_at = Utc::now();
            out
        })
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        Ok(self.db.user(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .db
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_oauth(&self, identity: &OAuthIdentity) -> Result<Option<User>, ApiError> {
        Ok(self
            .db
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.oauth.as_ref() == Some(identity))
            .cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .db
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let mut users = self.db.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.db.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::EmailAlreadyExists);
        }
        if user.oauth.is_some() && users.iter().any(|u| u.oauth == user.oauth) {
            return Err(ApiError::OAuthAccountConflict);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, ApiError> {
        Ok(self.with_user(id, |u| {
            u.name = update.name.clone();
            u.bio = update.bio.clone();
            u.skills = update.skills.clone();
            u.clone()
        }))
    }

    async fn update_password_hash(&self, id: UserId, hash: &str) -> Result<(), ApiError> {
        self.with_user(id, |u| u.password_hash = Some(hash.to_owned()));
        Ok(())
    }

    async fn update_role(&self, id: UserId, role: UserRole) -> Result<Option<User>, ApiError> {
        Ok(self.with_user(id, |u| {
            u.role = role;
            u.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> Result<bool, ApiError> {
        let mut users = self.db.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }

    async fn save_refresh_token(&self, id: UserId, token: Option<&str>) -> Result<(), ApiError> {
        self.with_user(id, |u| u.refresh_token = token.map(str::to_owned));
        Ok(())
    }

    async fn link_oauth(&self, id: UserId, identity: &OAuthIdentity) -> Result<(), ApiError> {
        self.with_user(id, |u| u.oauth = Some(identity.clone()));
        Ok(())
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

pub struct MockSessionRepo {
    pub db: MockDb,
}

impl MockSessionRepo {
    fn matches(filter: &SessionFilter, session: &Session, now: DateTime<Utc>) -> bool {
        filter.words().iter().all(|w| {
            contains_ci(&session.title, w) || contains_ci(&session.description, w)
        }) && filter
            .category
            .as_ref()
            .is_none_or(|c| &session.category == c)
            && filter
                .location
                .as_ref()
                .is_none_or(|l| contains_ci(&session.location, l))
            && filter.date_from.is_none_or(|from| session.date_time >= from)
            && filter.date_to.is_none_or(|to| session.date_time <= to)
            && (!filter.exclude_past || session.date_time > now)
            && filter.creator_id.is_none_or(|c| session.creator_id == c)
    }

    fn joined_ids(&self, user_id: UserId) -> Vec<SessionId> {
        self.db
            .participants
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, u)| *u == user_id)
            .map(|(s, _)| *s)
            .collect()
    }
}

impl SessionRepository for MockSessionRepo {
    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, ApiError> {
        Ok(self
            .db
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn create(&self, session: &Session) -> Result<(), ApiError> {
        self.db.add_session(session.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: SessionId,
        draft: &SessionDraft,
    ) -> Result<Option<Session>, ApiError> {
        let mut sessions = self.db.sessions.lock().unwrap();
        Ok(sessions.iter_mut().find(|s| s.id == id).map(|s| {
            s.title = draft.title.clone();
            s.description = draft.description.clone();
            s.category = draft.category.clone();
            s.date_time = draft.date_time;
            s.location = draft.location.clone();
            s.max_participants = draft.max_participants;
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn delete(&self, id: SessionId) -> Result<bool, ApiError> {
        let mut sessions = self.db.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        self.db.participants.lock().unwrap().retain(|(s, _)| *s != id);
        Ok(sessions.len() != before)
    }

    async fn search(
        &self,
        filter: &SessionFilter,
        page: PageRequest,
    ) -> Result<(Vec<Session>, u64), ApiError> {
        let now = Utc::now();
        let mut items: Vec<Session> = self
            .db
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| Self::matches(filter, s, now))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.date_time.cmp(&b.date_time).then(a.id.cmp(&b.id)));
        Ok(page_of(items, page))
    }

    async fn list_joined(
        &self,
        user_id: UserId,
        filter: &JoinedFilter,
        page: PageRequest,
    ) -> Result<(Vec<Session>, u64), ApiError> {
        let now = Utc::now();
        let joined = self.joined_ids(user_id);
        let mut items: Vec<Session> = self
            .db
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| joined.contains(&s.id))
            .filter(|s| filter.category.as_ref().is_none_or(|c| &s.category == c))
            .filter(|s| !filter.exclude_past || s.date_time > now)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.date_time.cmp(&a.date_time).then(a.id.cmp(&b.id)));
        Ok(page_of(items, page))
    }

    async fn recommended_for_user(
        &self,
        user_id: UserId,
        skills: &[String],
        limit: u64,
    ) -> Result<Vec<Session>, ApiError> {
        let now = Utc::now();
        let joined = self.joined_ids(user_id);
        let mut items: Vec<Session> = self
            .db
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.date_time > now && s.creator_id != user_id && !joined.contains(&s.id))
            .filter(|s| skills.is_empty() || skills.contains(&s.category))
            .cloned()
            .collect();
        if skills.is_empty() {
            items.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then(a.date_time.cmp(&b.date_time))
            });
        } else {
            items.sort_by(|a, b| a.date_time.cmp(&b.date_time));
        }
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn recommended(&self, limit: u64) -> Result<Vec<Session>, ApiError> {
        let now = Utc::now();
        let mut items: Vec<Session> = self
            .db
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.date_time > now)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.date_time.cmp(&b.date_time));
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>, ApiError> {
        let mut items: Vec<Session> = self
            .db
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.date_time > from && s.date_time <= to)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.date_time.cmp(&b.date_time));
        Ok(items)
    }

    async fn participants(&self, id: SessionId) -> Result<Vec<User>, ApiError> {
        let ids: Vec<UserId> = self
            .db
            .participants
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == id)
            .map(|(_, u)| *u)
            .collect();
        Ok(ids.into_iter().filter_map(|u| self.db.user(u)).collect())
    }

    async fn count_participants(&self, id: SessionId) -> Result<u64, ApiError> {
        Ok(self
            .db
            .participants
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == id)
            .count() as u64)
    }

    async fn is_participant(&self, id: SessionId, user_id: UserId) -> Result<bool, ApiError> {
        Ok(self
            .db
            .participants
            .lock()
            .unwrap()
            .contains(&(id, user_id)))
    }

    async fn join(&self, id: SessionId, user_id: UserId) -> Result<JoinOutcome, ApiError> {
        let Some(session) = self.find_by_id(id).await? else {
            return Ok(JoinOutcome::NotFound);
        };
        let mut participants = self.db.participants.lock().unwrap();
        let count = participants.iter().filter(|(s, _)| *s == id).count();
        if count >= session.max_participants as usize {
            return Ok(JoinOutcome::Full);
        }
        if participants.contains(&(id, user_id)) {
            return Ok(JoinOutcome::AlreadyJoined);
        }
        participants.push((id, user_id));
        Ok(JoinOutcome::Joined)
    }

    async fn leave(&self, id: SessionId, user_id: UserId) -> Result<bool, ApiError> {
        let mut participants = self.db.participants.lock().unwrap();
        let before = participants.len();
        participants.retain(|p| *p != (id, user_id));
        Ok(participants.len() != before)
    }
}

// ── MockFeedbackRepo ─────────────────────────────────────────────────────────

pub struct MockFeedbackRepo {
    pub db: MockDb,
}

impl FeedbackRepository for MockFeedbackRepo {
    async fn create(&self, feedback: &Feedback) -> Result<(), ApiError> {
        let mut rows = self.db.feedback.lock().unwrap();
        if rows
            .iter()
            .any(|f| f.session_id == feedback.session_id && f.user_id == feedback.user_id)
        {
            return Err(ApiError::FeedbackAlreadyExists);
        }
        rows.push(feedback.clone());
        Ok(())
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Feedback>, ApiError> {
        let mut items: Vec<Feedback> = self
            .db
            .feedback
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.session_id == session_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

// ── MockNotificationRepo ─────────────────────────────────────────────────────

pub struct MockNotificationRepo {
    pub db: MockDb,
    pub fail: bool,
}

impl MockNotificationRepo {
    fn check(&self) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Internal(anyhow::anyhow!("notifications table unavailable")));
        }
        Ok(())
    }
}

impl NotificationRepository for MockNotificationRepo {
    async fn create(&self, notification: &Notification) -> Result<(), ApiError> {
        self.check()?;
        self.db.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn list_unread(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<Notification>, ApiError> {
        self.check()?;
        let mut items: Vec<Notification> = self
            .db
            .notifications_for(user_id)
            .into_iter()
            .filter(|n| !n.is_read)
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<bool, ApiError> {
        self.check()?;
        let mut rows = self.db.notifications.lock().unwrap();
        match rows.iter_mut().find(|n| n.id == id && n.user_id == user_id) {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, ApiError> {
        self.check()?;
        let mut count = 0;
        for n in self.db.notifications.lock().unwrap().iter_mut() {
            if n.user_id == user_id && !n.is_read {
                n.is_read = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn has_reminder(&self, user_id: UserId, session_id: SessionId) -> Result<bool, ApiError> {
        self.check()?;
        Ok(self.db.notifications_for(user_id).iter().any(|n| {
            n.kind == NotificationKind::SessionReminder && n.related_id == Some(session_id.0)
        }))
    }
}

// ── MockOAuthProvider ────────────────────────────────────────────────────────

/// Returns `profile` for any code; `None` simulates a provider failure.
pub struct MockOAuthProvider {
    pub profile: Option<OAuthProfile>,
}

impl MockOAuthProvider {
    pub fn verified(subject: &str, email: &str) -> Self {
        Self {
            profile: Some(OAuthProfile {
                subject: subject.to_owned(),
                email: email.to_owned(),
                verified_email: true,
                name: "Oauth Person".to_owned(),
            }),
        }
    }
}

impl OAuthProvider for MockOAuthProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn authorize_url(&self, state: &str) -> Result<String, ApiError> {
        Ok(format!("https://provider.test/auth?state={state}"))
    }

    async fn exchange_code(&self, _code: &str) -> Result<OAuthProfile, ApiError> {
        self.profile
            .clone()
            .ok_or_else(|| ApiError::OAuthExchange(anyhow::anyhow!("provider returned 500")))
    }
}
