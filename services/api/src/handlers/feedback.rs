use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use skillshare_auth_types::identity::Identity;
use skillshare_domain::id::{FeedbackId, SessionId, UserId};

use crate::domain::types::Feedback;
use crate::error::ApiError;
use crate::handlers::validated;
use crate::state::AppState;
use crate::usecase::feedback::{CreateFeedbackInput, CreateFeedbackUseCase, ListFeedbackUseCase};

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub id: FeedbackId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub rating: i16,
    pub comment: String,
    #[serde(serialize_with = "skillshare_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id,
            session_id: feedback.session_id,
            user_id: feedback.user_id,
            rating: feedback.rating,
            comment: feedback.comment,
            created_at: feedback.created_at,
        }
    }
}

// ── POST /api/sessions/{id}/feedback ─────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i16,
    pub comment: Option<String>,
}

pub async fn create_feedback(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(body): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    let body = validated(body)?;
    let usecase = CreateFeedbackUseCase {
        sessions: state.session_repo(),
        feedback: state.feedback_repo(),
    };
    let feedback = usecase
        .execute(
            session_id,
            identity.user_id,
            CreateFeedbackInput {
                rating: body.rating,
                comment: body.comment.unwrap_or_default(),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(feedback.into())))
}

// ── GET /api/sessions/{id}/feedback ──────────────────────────────────────────

pub async fn list_feedback(
    _identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<Vec<FeedbackResponse>>, ApiError> {
    let usecase = ListFeedbackUseCase {
        sessions: state.session_repo(),
        feedback: state.feedback_repo(),
    };
    let items = usecase.execute(session_id).await?;
    Ok(Json(items.into_iter().map(FeedbackResponse::from).collect()))
}
