//! Handler trait, per-request context and the page error type.

use crate::http::{Request, Response};
use async_trait::async_trait;

/// Per-request context given to a handler.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Name of the handler serving the request.
    pub handler_name: String,
    /// Request ID for tracing.
    pub request_id: String,
}

impl RequestContext {
    pub fn new(handler_name: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            handler_name: handler_name.into(),
            request_id: request_id.into(),
        }
    }
}

/// Something that turns a [`Request`] into a [`Response`].
///
/// Handlers are invoked directly by the [`recorder`](crate::recorder) in
/// tests and through the [`Router`](crate::routing::Router) by the server.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn serve(&self, request: Request, ctx: &RequestContext) -> Result<Response, PageError>;

    /// Name used in logs and route listings.
    fn name(&self) -> &str;
}

/// Error returned by handlers; carries the HTTP status it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    pub message: String,
    pub code: u16,
}

impl PageError {
    /// Create an internal (500) error.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_code(500, message)
    }

    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(404, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(400, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::with_code(405, message)
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for PageError {}

impl From<PageError> for Response {
    fn from(err: PageError) -> Self {
        Response::error(err.code, err.message)
    }
}

impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        PageError::new(err.to_string())
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;

    #[test]
    fn test_error_display() {
        let err = PageError::not_found("no such page");
        assert_eq!(err.to_string(), "[404] no such page");
    }

    #[test]
    fn test_error_into_response() {
        let response: Response = PageError::method_not_allowed("POST not allowed").into();
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.text_body(), Some("POST not allowed".to_string()));
    }

    #[test]
    fn test_context_new() {
        let ctx = RequestContext::new("home", "req-1");
        assert_eq!(ctx.handler_name, "home");
        assert_eq!(ctx.request_id, "req-1");
    }
}
