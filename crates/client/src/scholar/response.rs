//! Semantic Scholar response shapes and outcome classification.

use papercache_core::FetchOutcome;
use serde::Deserialize;
use serde_json::Value;

use super::ScholarError;

/// The result part of a paper search response.
///
/// Everything else (`total`, `offset`, `next`, per-paper fields) is carried
/// untouched in the raw payload.
#[derive(Debug, Default, Deserialize)]
pub struct SearchEnvelope {
    /// Result list; `null` and absent are both treated as no data.
    #[serde(default)]
    pub data: Option<Value>,
}

impl SearchEnvelope {
    /// Number of papers when `data` is a list.
    pub fn result_count(&self) -> Option<usize> {
        self.data.as_ref().and_then(Value::as_array).map(Vec::len)
    }
}

/// Classify one upstream answer.
///
/// - 429 is rate limiting whatever the body.
/// - Any other non-2xx is passed through.
/// - A 2xx body must be a JSON object: non-null `data` is success (an empty
///   list included), otherwise a `message` key of any value means rate
///   limiting, otherwise the shape is unrecognized.
pub fn classify(status: u16, body: String) -> FetchOutcome {
    if status == 429 {
        return FetchOutcome::RateLimited(body);
    }

    if !(200..300).contains(&status) {
        return FetchOutcome::Rejected { status, body };
    }

    let object = match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return FetchOutcome::Failed(ScholarError::Parse("expected a JSON object".into()).into()),
        Err(e) => return FetchOutcome::Failed(ScholarError::Parse(e.to_string()).into()),
    };
    let has_message = object.contains_key("message");
    // `data` is an optional `Value`, so an object always fits.
    let envelope: SearchEnvelope = serde_json::from_value(Value::Object(object)).unwrap_or_default();

    if envelope.data.is_some() {
        tracing::debug!(results = ?envelope.result_count(), "search results received");
        FetchOutcome::Success(body)
    } else if has_message {
        FetchOutcome::RateLimited(body)
    } else {
        FetchOutcome::Unrecognized(body)
    }
}
