pub mod contact;
pub mod decoy;
pub mod health;
pub mod metrics;
pub mod script;
pub mod stats;
pub mod track;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Decode a JSON body into a typed payload. Structural violations (missing
/// required fields, wrong types) become a 400 before anything is written.
pub(crate) fn parse_json<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| {
        tracing::debug!(error = %err, "malformed request payload");
        ApiError::Validation
    })
}
