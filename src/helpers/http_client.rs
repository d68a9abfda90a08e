use std::sync::Arc;
use std::time::Duration;
use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

const USER_AGENT: &str = concat!("onair/", env!("CARGO_PKG_VERSION"));

/// Error types that can occur when interacting with HTTP clients
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("HTTP request error: {0}")]
    RequestError(String),

    #[error("Server returned status {0}")]
    StatusError(u16),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Empty response from server")]
    EmptyResponse,
}

/// A trait for HTTP client implementations
/// This version avoids generic methods to enable dynamic dispatch
pub trait HttpClient: Send + Sync + std::fmt::Debug {
    /// Send a POST request with a JSON payload and parse the JSON answer
    fn post_json_value(&self, url: &str, payload: Value, timeout: Duration) -> Result<Value, HttpClientError>;

    /// Send a GET request and return the body
    fn get_text(&self, url: &str, timeout: Duration) -> Result<String, HttpClientError>;

    /// Send a GET request and parse the body as JSON
    fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, HttpClientError> {
        let text = self.get_text(url, timeout)?;
        if text.trim().is_empty() {
            return Err(HttpClientError::EmptyResponse);
        }
        serde_json::from_str(&text).map_err(|e| HttpClientError::ParseError(e.to_string()))
    }

    /// Clone the client as a boxed trait object
    fn clone_box(&self) -> Box<dyn HttpClient>;
}

impl Clone for Box<dyn HttpClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// An HTTP client implementation using ureq
#[derive(Clone, Debug)]
pub struct UreqHttpClient {
    agent: ureq::Agent,
}

impl UreqHttpClient {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
        }
    }

    fn map_error(url: &str, err: ureq::Error) -> HttpClientError {
        match err {
            ureq::Error::Status(code, _) => {
                debug!("{} answered with status {}", url, code);
                HttpClientError::StatusError(code)
            }
            ureq::Error::Transport(t) => {
                // Display of a transport error starts with the full URL, query included
                let detail = match t.message() {
                    Some(message) => format!("{}: {}", t.kind(), message),
                    None => t.kind().to_string(),
                };
                debug!("Request to {} failed: {}", url, detail);
                HttpClientError::RequestError(detail)
            }
        }
    }
}

impl Default for UreqHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for UreqHttpClient {
    fn post_json_value(&self, url: &str, payload: Value, timeout: Duration) -> Result<Value, HttpClientError> {
        debug!("POST request to {}", redact(url));

        let json_string = serde_json::to_string(&payload)
            .map_err(|e| HttpClientError::ParseError(format!("Failed to serialize JSON payload: {}", e)))?;

        let response = self.agent
            .post(url)
            .timeout(timeout)
            .set("Content-Type", "application/json")
            .send_string(&json_string)
            .map_err(|e| Self::map_error(&redact(url), e))?;

        let response_text = response
            .into_string()
            .map_err(|e| HttpClientError::ParseError(format!("Failed to read response body: {}", e)))?;

        if response_text.is_empty() {
            return Err(HttpClientError::EmptyResponse);
        }

        serde_json::from_str::<Value>(&response_text).map_err(|e| {
            warn!("Failed to parse JSON response from {}: {}", redact(url), e);
            HttpClientError::ParseError(e.to_string())
        })
    }

    fn get_text(&self, url: &str, timeout: Duration) -> Result<String, HttpClientError> {
        debug!("GET request to {}", url);

        let response = self.agent
            .get(url)
            .timeout(timeout)
            .call()
            .map_err(|e| Self::map_error(url, e))?;

        response
            .into_string()
            .map_err(|e| HttpClientError::ParseError(format!("Failed to read response body: {}", e)))
    }

    fn clone_box(&self) -> Box<dyn HttpClient> {
        Box::new(self.clone())
    }
}

/// Strip the query string so API keys don't end up in the log
fn redact(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{}?...", base),
        None => url.to_string(),
    }
}

/// Create a new HTTP client using the default implementation
pub fn new_http_client() -> Arc<dyn HttpClient> {
    Arc::new(UreqHttpClient::new())
}
