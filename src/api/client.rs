use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{Ack, ApiError, StartRequest, WorkoutStatus};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Client for the workout tracker's REST API
#[derive(Debug, Clone)]
pub struct WorkoutApi {
    http: reqwest::Client,
    base_url: String,
}

impl WorkoutApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the backend address from WORKOUT_API_URL, falling back to
    /// the local default.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("WORKOUT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the backend to begin a session
    pub async fn start_exercise(&self, request: &StartRequest) -> Result<Ack, ApiError> {
        let response = self
            .http
            .post(format!("{}/start_exercise", self.base_url))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    /// Ask the backend to end the current session
    pub async fn stop_exercise(&self) -> Result<Ack, ApiError> {
        let response = self
            .http
            .post(format!("{}/stop_exercise", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch live session progress
    pub async fn get_status(&self) -> Result<WorkoutStatus, ApiError> {
        let response = self
            .http
            .get(format!("{}/get_status", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }
}

impl Default for WorkoutApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Shape of structured error bodies
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Normalize a response: pull a structured error message out of non-OK
/// statuses where one exists, enforce the JSON content type on OK
/// responses, and decode the payload.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    let is_json = content_type.contains("application/json");

    if !status.is_success() {
        if is_json {
            if let Ok(body) = response.json::<ErrorBody>().await {
                if let Some(error) = body.error {
                    return Err(ApiError::Backend(error));
                }
            }
        }
        return Err(ApiError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_string(),
        });
    }

    if !is_json {
        let got = if content_type.is_empty() {
            "no content type".to_string()
        } else {
            content_type
        };
        return Err(ApiError::ContentType(got));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
