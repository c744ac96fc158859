//! Outcome of the "sync & refresh" pipeline action.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// How long the status message stays visible.
pub const SYNC_MESSAGE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SyncOutcome {
    /// 2xx with a numeric `processed` count.
    Synced(u64),
    /// 2xx without a count.
    Complete,
    /// Non-2xx, with the backend's `error` field when present.
    Failed(Option<String>),
    /// The request never produced a response.
    Error(String),
}

impl SyncOutcome {
    /// Classify a response. `body` is whatever JSON could be decoded, or
    /// `Value::Null` when the body was not JSON.
    pub fn from_response(success: bool, body: &Value) -> SyncOutcome {
        if success {
            return match body.get("processed").and_then(processed_count) {
                Some(n) => SyncOutcome::Synced(n),
                None => SyncOutcome::Complete,
            };
        }
        let error = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        SyncOutcome::Failed(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Synced(_) | SyncOutcome::Complete)
    }
}

fn processed_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64))
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Synced(n) => write!(f, "Synced {n} records"),
            SyncOutcome::Complete => write!(f, "Sync complete"),
            SyncOutcome::Failed(Some(err)) => write!(f, "Sync failed: {err}"),
            SyncOutcome::Failed(None) => write!(f, "Sync failed"),
            SyncOutcome::Error(msg) if msg.is_empty() => write!(f, "Sync error: unknown error"),
            SyncOutcome::Error(msg) => write!(f, "Sync error: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages() {
        let synced = SyncOutcome::from_response(true, &json!({ "processed": 42 }));
        assert_eq!(synced.to_string(), "Synced 42 records");
        assert!(synced.is_success());

        let complete = SyncOutcome::from_response(true, &Value::Null);
        assert_eq!(complete.to_string(), "Sync complete");

        let failed = SyncOutcome::from_response(false, &json!({ "error": "db locked" }));
        assert_eq!(failed.to_string(), "Sync failed: db locked");
        assert!(!failed.is_success());

        assert_eq!(SyncOutcome::from_response(false, &json!({})).to_string(), "Sync failed");
        assert_eq!(
            SyncOutcome::Error("connection refused".into()).to_string(),
            "Sync error: connection refused"
        );
    }
}
