use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::error::IntakeError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

pub async fn ingest(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, IntakeError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let input = parser::parse_body(content_type, body)
        .await
        .map_err(IntakeError::BadRequest)?;

    pipeline::submit(&state, input).await?;

    Ok(StatusCode::CREATED)
}
