use chrono::{DateTime, Utc};

use skillshare_domain::id::{SessionId, UserId};
use skillshare_domain::notification::NotificationKind;
use skillshare_domain::pagination::{Page, PageMeta, PageRequest};
use skillshare_domain::user::UserRole;

use crate::domain::repository::{NotificationRepository, SessionRepository, UserRepository};
use crate::domain::types::{
    JoinOutcome, JoinedFilter, Notification, RECOMMENDED_LIMIT, Session, SessionDraft,
    SessionFilter, User, new_participant_message, session_update_message,
};
use crate::error::ApiError;

/// Only the creator may edit a session.
pub fn can_edit(session: &Session, actor: UserId) -> bool {
    session.creator_id == actor
}

/// Owners delete their sessions; moderators and admins delete any.
pub fn can_manage(session: &Session, actor: UserId, role: UserRole) -> bool {
    session.creator_id == actor || role.is_privileged()
}

/// A new schedule must lie in the future. On update, `current` (the stored
/// time) is accepted unchanged even once it has passed.
pub fn check_schedule(
    date_time: DateTime<Utc>,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    if date_time > now || current == Some(date_time) {
        Ok(())
    } else {
        Err(ApiError::Validation("date_time must be in the future".to_owned()))
    }
}

/// Title, category and location must be non-blank; capacity at least 1.
pub fn check_draft(draft: &SessionDraft) -> Result<(), ApiError> {
    for (field, value) in [
        ("title", &draft.title),
        ("category", &draft.category),
        ("location", &draft.location),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
    }
    if draft.max_participants < 1 {
        return Err(ApiError::Validation(
            "max_participants must be at least 1".to_owned(),
        ));
    }
    Ok(())
}

// ── CreateSession ────────────────────────────────────────────────────────────

pub struct CreateSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> CreateSessionUseCase<S> {
    pub async fn execute(&self, creator: UserId, draft: SessionDraft) -> Result<Session, ApiError> {
        let now = Utc::now();
        check_draft(&draft)?;
        check_schedule(draft.date_time, None, now)?;

        let session = Session {
            id: SessionId::new(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            date_time: draft.date_time,
            location: draft.location,
            max_participants: draft.max_participants,
            creator_id: creator,
            created_at: now,
            updated_at: now,
        };
        self.sessions.create(&session).await?;
        Ok(session)
    }
}

// ── GetSession ───────────────────────────────────────────────────────────────

pub struct GetSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> GetSessionUseCase<S> {
    pub async fn execute(&self, id: SessionId) -> Result<Session, ApiError> {
        self.sessions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::SessionNotFound)
    }
}

// ── UpdateSession ────────────────────────────────────────────────────────────

pub struct UpdateSessionUseCase<S: SessionRepository, N: NotificationRepository> {
    pub sessions: S,
    pub notifications: N,
}

impl<S: SessionRepository, N: NotificationRepository> UpdateSessionUseCase<S, N> {
    pub async fn execute(
        &self,
        actor: UserId,
        id: SessionId,
        draft: SessionDraft,
    ) -> Result<Session, ApiError> {
        let current = self
            .sessions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::SessionNotFound)?;
        if !can_edit(&current, actor) {
            return Err(ApiError::Forbidden);
        }
        check_draft(&draft)?;
        check_schedule(draft.date_time, Some(current.date_time), Utc::now())?;

        let updated = self
            .sessions
            .update(id, &draft)
            .await?
            .ok_or(ApiError::SessionNotFound)?;

        self.notify_participants(&updated).await;
        Ok(updated)
    }

    async fn notify_participants(&self, session: &Session) {
        let participants = match self.sessions.participants(session.id).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = ?e, "failed to load participants for update notice");
                return;
            }
        };
        let message = session_update_message(&session.title);
        for participant in participants {
            let notification = Notification::about_session(
                participant.id,
                NotificationKind::SessionUpdate,
                message.clone(),
                session.id,
            );
            if let Err(e) = self.notifications.create(&notification).await {
                tracing::warn!(session_id = %session.id, user_id = %participant.id, error = ?e, "failed to send update notice");
            }
        }
    }
}

// ── DeleteSession ────────────────────────────────────────────────────────────

pub struct DeleteSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> DeleteSessionUseCase<S> {
    pub async fn execute(&self, actor: UserId, role: UserRole, id: SessionId) -> Result<(), ApiError> {
        let session = self
            .sessions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::SessionNotFound)?;
        if !can_manage(&session, actor, role) {
            return Err(ApiError::Forbidden);
        }
        if !self.sessions.delete(id).await? {
            return Err(ApiError::SessionNotFound);
        }
        if session.creator_id != actor {
            tracing::info!(session_id = %id, actor = %actor, role = %role, "session deleted by staff");
        }
        Ok(())
    }
}

// ── SearchSessions ───────────────────────────────────────────────────────────

pub struct SearchSessionsUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> SearchSessionsUseCase<S> {
    pub async fn execute(
        &self,
        filter: SessionFilter,
        page: PageRequest,
    ) -> Result<Page<Session>, ApiError> {
        let page = page.clamped();
        let (data, total) = self.sessions.search(&filter, page).await?;
        Ok(Page {
            data,
            meta: PageMeta::new(total, page),
        })
    }
}

// ── ListJoinedSessions ───────────────────────────────────────────────────────

pub struct ListJoinedSessionsUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> ListJoinedSessionsUseCase<S> {
    pub async fn execute(
        &self,
        user_id: UserId,
        filter: JoinedFilter,
        page: PageRequest,
    ) -> Result<Page<Session>, ApiError> {
        let page = page.clamped();
        let (data, total) = self.sessions.list_joined(user_id, &filter, page).await?;
        Ok(Page {
            data,
            meta: PageMeta::new(total, page),
        })
    }
}

// ── RecommendedSessions ──────────────────────────────────────────────────────

pub struct RecommendedSessionsUseCase<S: SessionRepository, U: UserRepository> {
    pub sessions: S,
    pub users: U,
}

impl<S: SessionRepository, U: UserRepository> RecommendedSessionsUseCase<S, U> {
    /// Personalised for `viewer` when present, otherwise the soonest sessions.
    pub async fn execute(&self, viewer: Option<UserId>) -> Result<Vec<Session>, ApiError> {
        let Some(viewer) = viewer else {
            return self.sessions.recommended(RECOMMENDED_LIMIT).await;
        };
        let user = self
            .users
            .find_by_id(viewer)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        self.sessions
            .recommended_for_user(viewer, &user.skills, RECOMMENDED_LIMIT)
            .await
    }
}

// ── ListParticipants ─────────────────────────────────────────────────────────

pub struct ListParticipantsUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> ListParticipantsUseCase<S> {
    pub async fn execute(&self, id: SessionId) -> Result<Vec<User>, ApiError> {
        if self.sessions.find_by_id(id).await?.is_none() {
            return Err(ApiError::SessionNotFound);
        }
        self.sessions.participants(id).await
    }
}

// ── JoinSession ──────────────────────────────────────────────────────────────

pub struct JoinSessionUseCase<S: SessionRepository, U: UserRepository, N: NotificationRepository> {
    pub sessions: S,
    pub users: U,
    pub notifications: N,
}

impl<S, U, N> JoinSessionUseCase<S, U, N>
where
    S: SessionRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    pub async fn execute(&self, id: SessionId, user_id: UserId) -> Result<(), ApiError> {
        let session = self
            .sessions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::SessionNotFound)?;
        if session.creator_id == user_id {
            return Err(ApiError::CannotJoinOwnSession);
        }

        match self.sessions.join(id, user_id).await? {
            JoinOutcome::Joined => {}
            JoinOutcome::Full => return Err(ApiError::SessionFull),
            JoinOutcome::AlreadyJoined => return Err(ApiError::AlreadyJoined),
            JoinOutcome::NotFound => return Err(ApiError::SessionNotFound),
        }

        self.notify_creator(&session, user_id).await;
        Ok(())
    }

    async fn notify_creator(&self, session: &Session, participant_id: UserId) {
        let name = match self.users.find_by_id(participant_id).await {
            Ok(Some(user)) => user.name,
            Ok(None) => "Someone".to_owned(),
            Err(e) => {
                tracing::warn!(user_id = %participant_id, error = ?e, "failed to load participant for join notice");
                "Someone".to_owned()
            }
        };
        let notification = Notification::about_session(
            session.creator_id,
            NotificationKind::NewParticipant,
            new_participant_message(&name, &session.title),
            session.id,
        );
        if let Err(e) = self.notifications.create(&notification).await {
            tracing::warn!(session_id = %session.id, error = ?e, "failed to send join notice");
        }
    }
}

// ── LeaveSession ─────────────────────────────────────────────────────────────

pub struct LeaveSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> LeaveSessionUseCase<S> {
    pub async fn execute(&self, id: SessionId, user_id: UserId) -> Result<(), ApiError> {
        if self.sessions.find_by_id(id).await?.is_none() {
            return Err(ApiError::SessionNotFound);
        }
        if !self.sessions.leave(id, user_id).await? {
            return Err(ApiError::NotJoined);
        }
        Ok(())
    }
}
