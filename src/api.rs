//! HTTP client for the game tracker API.
//!
//! Every call is a single round trip: no retries, no timeout, no caching.

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{Game, NewGame, Review};

/// The one failure the views ever see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    RequestFailed { message: String },
}

impl ApiError {
    pub fn request_failed(message: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::RequestFailed { message } => message,
        }
    }

    /// Message used when an error response carries no `message` of its own.
    pub fn from_status(status: StatusCode) -> Self {
        Self::request_failed(format!(
            "request failed with HTTP status {}",
            status.as_u16()
        ))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::request_failed(err.to_string())
    }
}

/// Optional JSON body of a non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Game tracker API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// Both `http://host:port` and `http://host:port/api` are accepted.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    pub async fn list_games(&self) -> Result<Vec<Game>, ApiError> {
        self.send(Method::GET, "games", None).await
    }

    pub async fn create_game(&self, draft: &NewGame) -> Result<Game, ApiError> {
        let body = serde_json::to_value(draft)
            .map_err(|e| ApiError::request_failed(format!("could not encode game: {e}")))?;
        self.send(Method::POST, "games", Some(body)).await
    }

    pub async fn list_reviews_for_game(&self, game_id: &str) -> Result<Vec<Review>, ApiError> {
        self.send(Method::GET, &format!("reviews/game/{game_id}"), None)
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(%method, %url, "sending request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let resp = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "request did not reach the server");
            ApiError::from(e)
        })?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let err = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(ErrorBody {
                    message: Some(message),
                }) if !message.is_empty() => ApiError::request_failed(message),
                _ => ApiError::from_status(status),
            };
            warn!(%method, %url, status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(%method, %url, error = %e, "undecodable response body");
            ApiError::request_failed(format!("invalid response from server: {e}"))
        })
    }
}

/// Trims trailing slashes and a trailing `/api` segment.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/api").unwrap_or(trimmed);
    trimmed.trim_end_matches('/').to_string()
}
