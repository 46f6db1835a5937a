pub mod parser;
pub mod pipeline;

use serde_json::{Map, Value};

use crate::error::{IntakeError, MISSING_FEEDBACK};

pub const FEEDBACK_FIELD: &str = "feedback";

/// The only schema check: `feedback` must be present and non-null. Any
/// other value type is accepted.
pub fn validate(input: &Map<String, Value>) -> Result<&Value, IntakeError> {
    match input.get(FEEDBACK_FIELD) {
        Some(Value::Null) | None => {
            tracing::info!("{MISSING_FEEDBACK}");
            Err(IntakeError::Validation(MISSING_FEEDBACK.to_string()))
        }
        Some(value) => Ok(value),
    }
}
