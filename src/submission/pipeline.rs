use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::IntakeError;
use crate::models::{FeedbackCreated, FeedbackRecord};
use crate::state::{AppState, SharedState};

use super::validate;

/// Accept one submission: validate, assign an id, persist, then notify.
///
/// Returns the new record's id only when both the store write and the
/// publish succeeded. Persist is always acknowledged before publish is
/// attempted, so subscribers can read the record as soon as they see the
/// event. A failed publish leaves the stored record in place.
pub async fn submit(state: &SharedState, input: Map<String, Value>) -> Result<Uuid, IntakeError> {
    validate(&input)?;

    let id = Uuid::new_v4();

    // Detached from the request future so a client disconnect cannot stop
    // the sequence between persist and notify.
    let state = state.clone();
    tokio::spawn(async move {
        let record = FeedbackRecord::new(id, input, Utc::now());
        persist_and_notify(&state, record).await
    })
    .await
    .map_err(|e| IntakeError::Internal(format!("Intake task for feedback {id} failed: {e}")))?
}

async fn persist_and_notify(state: &AppState, record: FeedbackRecord) -> Result<Uuid, IntakeError> {
    let id = record.id;

    state
        .store
        .put(&state.config.collection, &record.key(), &record.to_document())
        .await
        .map_err(|e| IntakeError::Persistence {
            id,
            reason: e.to_string(),
        })?;

    tracing::info!(feedback_id = %id, collection = %state.config.collection, "New feedback saved");

    let payload = FeedbackCreated { new_feedback_id: id }
        .to_bytes()
        .map_err(|e| IntakeError::Notification {
            id,
            reason: format!("Failed to encode event: {e}"),
        })?;

    state
        .publisher
        .publish(&state.config.topic, payload)
        .await
        .map_err(|e| IntakeError::Notification {
            id,
            reason: e.to_string(),
        })?;

    tracing::info!(feedback_id = %id, topic = %state.config.topic, "Feedback created event published");

    Ok(id)
}
