use std::borrow::Cow;

use serde::Serialize;
use validator::{Validate, ValidationError};

use skillshare_auth_types::identity::Identity;
use skillshare_domain::user::UserRole;

use crate::error::ApiError;

pub mod admin;
pub mod auth;
pub mod feedback;
pub mod health;
pub mod notification;
pub mod oauth;
pub mod session;
pub mod user;

/// `{"message": "..."}` acknowledgement body.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// 403 unless the caller holds at least `role`.
pub fn require_role(identity: &Identity, role: UserRole) -> Result<(), ApiError> {
    if identity.has_role(role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Run `validator` rules on a request body.
pub fn validated<T: Validate>(body: T) -> Result<T, ApiError> {
    body.validate()?;
    Ok(body)
}

/// `validator` rule: rejects strings that are empty once trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("is required")));
    }
    Ok(())
}
