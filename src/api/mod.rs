mod client;

pub use client::WorkoutApi;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload for starting a session
#[derive(Debug, Clone, Serialize)]
pub struct StartRequest {
    /// Exercise identifier (e.g. "squats.exe")
    pub exercise_type: String,
    pub sets: u32,
    pub reps: u32,
}

/// Acknowledgement returned by the start and stop endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Live progress reported by the status endpoint. Counter fields default
/// to zero so an ended session may report just `exercise_running: false`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutStatus {
    pub exercise_running: bool,
    #[serde(default)]
    pub current_set: u32,
    #[serde(default)]
    pub total_sets: u32,
    #[serde(default)]
    pub current_reps: u32,
    #[serde(default)]
    pub rep_goal: u32,
}

/// Failures while talking to the workout backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the request with a structured error body
    #[error("{0}")]
    Backend(String),
    /// Non-OK response without a usable error body
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },
    /// OK response that was not application/json
    #[error("expected JSON response but got {0}")]
    ContentType(String),
    /// Body claimed to be JSON but did not decode
    #[error("malformed JSON payload: {0}")]
    Payload(#[from] serde_json::Error),
    /// The request never completed
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_decodes_without_counters() {
        let status: WorkoutStatus =
            serde_json::from_str(r#"{"exercise_running": false}"#).unwrap();
        assert!(!status.exercise_running);
        assert_eq!(status.current_set, 0);
        assert_eq!(status.total_sets, 0);
        assert_eq!(status.current_reps, 0);
        assert_eq!(status.rep_goal, 0);
    }

    #[test]
    fn test_ack_error_is_optional() {
        let ack: Ack = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ack.success);
        assert!(ack.error.is_none());

        let ack: Ack =
            serde_json::from_str(r#"{"success": false, "error": "busy"}"#).unwrap();
        assert!(!ack.success);
        assert_eq!(ack.error.as_deref(), Some("busy"));
    }

    #[test]
    fn test_error_messages() {
        let err = ApiError::Http {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");

        let err = ApiError::ContentType("text/html".to_string());
        assert_eq!(err.to_string(), "expected JSON response but got text/html");
    }
}
