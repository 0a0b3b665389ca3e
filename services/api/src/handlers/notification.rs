use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skillshare_auth_types::identity::Identity;
use skillshare_domain::id::{NotificationId, UserId};
use skillshare_domain::notification::NotificationKind;

use crate::domain::types::Notification;
use crate::error::ApiError;
use crate::handlers::MessageResponse;
use crate::state::AppState;
use crate::usecase::notification::{ListUnreadUseCase, MarkAllReadUseCase, MarkReadUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    #[serde(serialize_with = "skillshare_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_type: Option<String>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            message: n.message,
            kind: n.kind,
            is_read: n.is_read,
            created_at: n.created_at,
            related_id: n.related_id,
            related_type: n.related_type,
        }
    }
}

// ── GET /api/notifications/unread ────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UnreadQuery {
    pub limit: Option<u64>,
}

pub async fn list_unread(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<UnreadQuery>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let usecase = ListUnreadUseCase {
        repo: state.notification_repo(),
    };
    let items = usecase.execute(identity.user_id, query.limit).await?;
    Ok(Json(items.into_iter().map(NotificationResponse::from).collect()))
}

// ── POST /api/notifications/{id}/read ────────────────────────────────────────

pub async fn mark_read(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = MarkReadUseCase {
        repo: state.notification_repo(),
    };
    usecase.execute(id, identity.user_id).await?;
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

// ── POST /api/notifications/read-all ─────────────────────────────────────────

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub message: &'static str,
    pub count: u64,
}

pub async fn mark_all_read(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let usecase = MarkAllReadUseCase {
        repo: state.notification_repo(),
    };
    let count = usecase.execute(identity.user_id).await?;
    Ok(Json(MarkAllReadResponse {
        message: "All notifications marked as read",
        count,
    }))
}
