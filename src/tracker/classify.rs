//! Classification of raw HTTP responses into [`RequestOutcome`]s.
//!
//! This is the only place that inspects status codes and error text; retry
//! logic downstream matches on the outcome variants alone.

use serde::Deserialize;

use crate::ports::RequestOutcome;

/// Error body shape used by GitHub-style APIs.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Classifies one HTTP response.
///
/// - `429`, or `403` whose message mentions "rate limit" (any case), is
///   [`RequestOutcome::RateLimited`];
/// - any other non-2xx status is [`RequestOutcome::PermanentError`];
/// - a 2xx body is parsed as JSON (empty bodies become `null`).
#[must_use]
pub fn classify(status: u16, retry_after_secs: Option<u64>, body: &str) -> RequestOutcome {
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return RequestOutcome::Success(serde_json::Value::Null);
        }
        return match serde_json::from_str(body) {
            Ok(value) => RequestOutcome::Success(value),
            Err(e) => RequestOutcome::PermanentError {
                status,
                message: format!("response body is not valid JSON: {e}"),
            },
        };
    }

    let message = error_message(status, body);
    if status == 429 || (status == 403 && message.to_lowercase().contains("rate limit")) {
        RequestOutcome::RateLimited { retry_after_secs, message }
    } else {
        RequestOutcome::PermanentError { status, message }
    }
}

/// Extracts the `message` field of a JSON error body, falling back to the raw text.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if !parsed.message.is_empty() {
            return parsed.message;
        }
    }
    let text = body.trim();
    if text.is_empty() {
        format!("HTTP {status} with empty body")
    } else {
        text.to_string()
    }
}
