//! HTTP response value produced by page handlers.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Content type used for every HTML page.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    /// Check if the status code indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// Check if the status code indicates a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// Check if the status code indicates a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::OK
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// HTTP response returned by a [`Handler`](crate::handler::Handler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// HTTP headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Bytes>,
}

impl Response {
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create an empty 200 response.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Create a 200 response with an HTML body.
    pub fn html(content: impl Into<String>) -> Self {
        Self::new(StatusCode::OK)
            .header("Content-Type", HTML_CONTENT_TYPE)
            .body(content.into())
    }

    /// Create a response with JSON body.
    pub fn json<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(data)?;
        Ok(Self::new(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(body))
    }

    /// Create a text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(StatusCode::OK)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(content.into())
    }

    /// Create an error response.
    pub fn error(status: impl Into<StatusCode>, message: impl Into<String>) -> Self {
        Self::new(status)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(message.into())
    }

    /// Add a header, replacing any header with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
        self
    }

    /// Set the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Drop the body, keeping status and headers. Used to answer HEAD.
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    /// Case-insensitive header lookup.
    pub fn get_header(&self, key: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Get the body as text if present.
    pub fn text_body(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).to_string())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}
