use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use skillshare_auth_types::identity::Identity;
use skillshare_domain::id::{SessionId, UserId};
use skillshare_domain::pagination::{Page, PageRequest};
use skillshare_domain::user::UserRole;

use crate::domain::ics;
use crate::domain::types::{JoinedFilter, Session, SessionDraft, SessionFilter};
use crate::error::ApiError;
use crate::handlers::user::UserResponse;
use crate::handlers::{MessageResponse, require_role, validated};
use crate::state::AppState;
use crate::usecase::session::{
    CreateSessionUseCase, DeleteSessionUseCase, GetSessionUseCase, JoinSessionUseCase,
    LeaveSessionUseCase, ListJoinedSessionsUseCase, ListParticipantsUseCase,
    RecommendedSessionsUseCase, SearchSessionsUseCase, UpdateSessionUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: SessionId,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(serialize_with = "skillshare_core::serde::to_rfc3339_ms")]
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub creator_id: UserId,
    #[serde(serialize_with = "skillshare_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "skillshare_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            title: session.title,
            description: session.description,
            category: session.category,
            date_time: session.date_time,
            location: session.location,
            max_participants: session.max_participants,
            creator_id: session.creator_id,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SessionListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub exclude_past: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Unparsable dates are ignored rather than rejected.
fn parse_date(param: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(param, value, error = %e, "ignoring unparsable date filter");
            None
        }
    }
}

/// Only the literal `false` turns the filter off.
fn exclude_past(value: Option<&str>) -> bool {
    value != Some("false")
}

fn page_request(limit: Option<u32>, page: Option<u32>) -> PageRequest {
    let default = PageRequest::default();
    PageRequest {
        limit: limit.unwrap_or(default.limit),
        page: page.unwrap_or(default.page),
    }
}

impl SessionListQuery {
    pub fn into_filter(self) -> (SessionFilter, PageRequest) {
        let filter = SessionFilter {
            date_from: parse_date("date_from", self.date_from.as_deref()),
            date_to: parse_date("date_to", self.date_to.as_deref()),
            exclude_past: exclude_past(self.exclude_past.as_deref()),
            query: non_empty(self.q),
            category: non_empty(self.category),
            location: non_empty(self.location),
            creator_id: None,
        };
        (filter, page_request(self.limit, self.page))
    }
}

#[derive(Deserialize, Default)]
pub struct JoinedQuery {
    pub category: Option<String>,
    pub exclude_past: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

// ── GET /api/sessions ────────────────────────────────────────────────────────

pub async fn list_sessions(
    _identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<Page<SessionResponse>>, ApiError> {
    let (filter, page) = query.into_filter();
    let usecase = SearchSessionsUseCase {
        sessions: state.session_repo(),
    };
    let page = usecase.execute(filter, page).await?;
    Ok(Json(page.map(SessionResponse::from)))
}

// ── GET /api/sessions/my ─────────────────────────────────────────────────────

pub async fn my_sessions(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<Page<SessionResponse>>, ApiError> {
    let (mut filter, page) = query.into_filter();
    filter.creator_id = Some(identity.user_id);
    let usecase = SearchSessionsUseCase {
        sessions: state.session_repo(),
    };
    let page = usecase.execute(filter, page).await?;
    Ok(Json(page.map(SessionResponse::from)))
}

// ── GET /api/sessions/joined ─────────────────────────────────────────────────

pub async fn joined_sessions(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<JoinedQuery>,
) -> Result<Json<Page<SessionResponse>>, ApiError> {
    let filter = JoinedFilter {
        category: non_empty(query.category),
        exclude_past: exclude_past(query.exclude_past.as_deref()),
    };
    let usecase = ListJoinedSessionsUseCase {
        sessions: state.session_repo(),
    };
    let page = usecase
        .execute(identity.user_id, filter, page_request(query.limit, query.page))
        .await?;
    Ok(Json(page.map(SessionResponse::from)))
}

// ── GET /api/sessions/recommended ────────────────────────────────────────────

pub async fn recommended_sessions(
    identity: Option<Identity>,
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let usecase = RecommendedSessionsUseCase {
        sessions: state.session_repo(),
        users: state.user_repo(),
    };
    let sessions = usecase.execute(identity.map(|i| i.user_id)).await?;
    Ok(Json(sessions.into_iter().map(SessionResponse::from).collect()))
}

// ── GET /api/sessions/{id} ───────────────────────────────────────────────────

pub async fn get_session(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionResponse>, ApiError> {
    let usecase = GetSessionUseCase {
        sessions: state.session_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /api/sessions ───────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SessionRequest {
    #[validate(custom(function = "crate::handlers::not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "crate::handlers::not_blank"))]
    pub category: String,
    pub date_time: DateTime<Utc>,
    #[validate(custom(function = "crate::handlers::not_blank"))]
    pub location: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub max_participants: i32,
}

impl From<SessionRequest> for SessionDraft {
    fn from(body: SessionRequest) -> Self {
        Self {
            title: body.title.trim().to_owned(),
            description: body.description,
            category: body.category.trim().to_owned(),
            date_time: body.date_time,
            location: body.location.trim().to_owned(),
            max_participants: body.max_participants,
        }
    }
}

pub async fn create_session(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<SessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let body = validated(body)?;
    let usecase = CreateSessionUseCase {
        sessions: state.session_repo(),
    };
    let session = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

// ── PUT /api/sessions/{id} ───────────────────────────────────────────────────

pub async fn update_session(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(body): Json<SessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let body = validated(body)?;
    let usecase = UpdateSessionUseCase {
        sessions: state.session_repo(),
        notifications: state.notification_repo(),
    };
    let session = usecase
        .execute(identity.user_id, id, body.into())
        .await?;
    Ok(Json(session.into()))
}

// ── DELETE /api/sessions/{id} ────────────────────────────────────────────────

pub async fn delete_session(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = DeleteSessionUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(identity.user_id, identity.role, id).await?;
    Ok(Json(MessageResponse::new("Session deleted successfully")))
}

// ── DELETE /api/moderator/sessions/{id} ──────────────────────────────────────

pub async fn moderator_delete_session(
    identity: Identity,
    state: State<AppState>,
    id: Path<SessionId>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_role(&identity, UserRole::Moderator)?;
    delete_session(identity, state, id).await
}

// ── GET /api/sessions/{id}/participants ──────────────────────────────────────

pub async fn list_participants(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListParticipantsUseCase {
        sessions: state.session_repo(),
    };
    let users = usecase.execute(id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /api/sessions/{id}/join ─────────────────────────────────────────────

pub async fn join_session(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = JoinSessionUseCase {
        sessions: state.session_repo(),
        users: state.user_repo(),
        notifications: state.notification_repo(),
    };
    usecase.execute(id, identity.user_id).await?;
    Ok(Json(MessageResponse::new("Successfully joined session")))
}

// ── POST /api/sessions/{id}/leave ────────────────────────────────────────────

pub async fn leave_session(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = LeaveSessionUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(id, identity.user_id).await?;
    Ok(Json(MessageResponse::new("Successfully left session")))
}

// ── GET /api/sessions/{id}/ics ───────────────────────────────────────────────

pub async fn export_ics(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = GetSessionUseCase {
        sessions: state.session_repo(),
    };
    let session = usecase.execute(id).await?;
    let body = ics::render_session(&session, &state.frontend_url, Utc::now());
    let disposition = format!("attachment; filename=\"{}\"", ics::filename(&session.title));
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
