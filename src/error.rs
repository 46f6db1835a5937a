use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

pub const MISSING_FEEDBACK: &str = "Missing input param \"feedback\".";

#[derive(Debug)]
pub enum IntakeError {
    /// Required `feedback` field absent or null. Nothing was written.
    Validation(String),
    /// Body could not be parsed at all.
    BadRequest(String),
    /// Store write failed; no event was published.
    Persistence { id: Uuid, reason: String },
    /// Publish failed after the record was stored. The record is orphaned.
    Notification { id: Uuid, reason: String },
    Internal(String),
}

impl std::fmt::Display for IntakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeError::Validation(msg) => write!(f, "Validation Error: {msg}"),
            IntakeError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            IntakeError::Persistence { id, reason } => {
                write!(f, "Persistence Error (new feedback ID = {id}): {reason}")
            }
            IntakeError::Notification { id, reason } => {
                write!(f, "Notification Error (new feedback ID = {id}): {reason}")
            }
            IntakeError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::error::Error for IntakeError {}

impl IntakeError {
    pub fn status(&self) -> StatusCode {
        match self {
            IntakeError::Validation(_) | IntakeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            IntakeError::Persistence { .. }
            | IntakeError::Notification { .. }
            | IntakeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            IntakeError::Validation(msg) => (status, msg).into_response(),
            IntakeError::BadRequest(msg) => {
                tracing::info!("Rejected unparseable body: {msg}");
                (status, msg).into_response()
            }
            // Store failure and publish failure are indistinguishable to the caller
            IntakeError::Persistence { id, reason } => {
                tracing::error!(feedback_id = %id, "Error saving feedback: {reason}");
                status.into_response()
            }
            IntakeError::Notification { id, reason } => {
                tracing::error!(
                    feedback_id = %id,
                    "Feedback saved but notification failed, record is orphaned: {reason}"
                );
                status.into_response()
            }
            IntakeError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                status.into_response()
            }
        }
    }
}
