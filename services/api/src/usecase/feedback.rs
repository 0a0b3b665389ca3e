use chrono::Utc;

use skillshare_domain::id::{FeedbackId, SessionId, UserId};

use crate::domain::repository::{FeedbackRepository, SessionRepository};
use crate::domain::types::Feedback;
use crate::error::ApiError;

// ── CreateFeedback ───────────────────────────────────────────────────────────

pub struct CreateFeedbackInput {
    pub rating: i16,
    pub comment: String,
}

pub struct CreateFeedbackUseCase<S: SessionRepository, F: FeedbackRepository> {
    pub sessions: S,
    pub feedback: F,
}

impl<S: SessionRepository, F: FeedbackRepository> CreateFeedbackUseCase<S, F> {
    pub async fn execute(
        &self,
        session_id: SessionId,
        author: UserId,
        input: CreateFeedbackInput,
    ) -> Result<Feedback, ApiError> {
        if !(1..=5).contains(&input.rating) {
            return Err(ApiError::Validation("rating must be between 1 and 5".to_owned()));
        }
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(ApiError::SessionNotFound)?;
        if session.creator_id == author {
            return Err(ApiError::Forbidden);
        }
        if !self.sessions.is_participant(session_id, author).await? {
            return Err(ApiError::Forbidden);
        }

        let feedback = Feedback {
            id: FeedbackId::new(),
            session_id,
            user_id: author,
            rating: input.rating,
            comment: input.comment,
            created_at: Utc::now(),
        };
        self.feedback.create(&feedback).await?;
        Ok(feedback)
    }
}

// ── ListFeedback ─────────────────────────────────────────────────────────────

pub struct ListFeedbackUseCase<S: SessionRepository, F: FeedbackRepository> {
    pub sessions: S,
    pub feedback: F,
}

impl<S: SessionRepository, F: FeedbackRepository> ListFeedbackUseCase<S, F> {
    pub async fn execute(&self, session_id: SessionId) -> Result<Vec<Feedback>, ApiError> {
        if self.sessions.find_by_id(session_id).await?.is_none() {
            return Err(ApiError::SessionNotFound);
        }
        self.feedback.list_by_session(session_id).await
    }
}
