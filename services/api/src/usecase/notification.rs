use skillshare_domain::id::{NotificationId, UserId};

use crate::domain::repository::NotificationRepository;
use crate::domain::types::{Notification, UNREAD_DEFAULT_LIMIT, UNREAD_MAX_LIMIT};
use crate::error::ApiError;

// ── ListUnread ───────────────────────────────────────────────────────────────

pub struct ListUnreadUseCase<N: NotificationRepository> {
    pub repo: N,
}

impl<N: NotificationRepository> ListUnreadUseCase<N> {
    /// `limit` defaults to 10 and is clamped to 1..=50.
    pub async fn execute(
        &self,
        user_id: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<Notification>, ApiError> {
        let limit = limit
            .unwrap_or(UNREAD_DEFAULT_LIMIT)
            .clamp(1, UNREAD_MAX_LIMIT);
        self.repo.list_unread(user_id, limit).await
    }
}

// ── MarkRead ─────────────────────────────────────────────────────────────────

pub struct MarkReadUseCase<N: NotificationRepository> {
    pub repo: N,
}

impl<N: NotificationRepository> MarkReadUseCase<N> {
    pub async fn execute(&self, id: NotificationId, user_id: UserId) -> Result<(), ApiError> {
        if !self.repo.mark_read(id, user_id).await? {
            return Err(ApiError::NotificationNotFound);
        }
        Ok(())
    }
}

// ── MarkAllRead ──────────────────────────────────────────────────────────────

pub struct MarkAllReadUseCase<N: NotificationRepository> {
    pub repo: N,
}

impl<N: NotificationRepository> MarkAllReadUseCase<N> {
    pub async fn execute(&self, user_id: UserId) -> Result<u64, ApiError> {
        self.repo.mark_all_read(user_id).await
    }
}
