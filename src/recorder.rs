//! In-memory response recorder.
//!
//! Lets tests drive a [`Handler`] or a [`Router`] directly, without a
//! socket, and inspect what came back.
//!
//! ```rust
//! use homepage::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let request = Request::build("GET", "/home")?;
//! let rr = recorder::serve(&HomePage::default(), request).await;
//! assert_eq!(rr.code, StatusCode::OK);
//! assert_eq!(rr.header("Content-Type"), Some("text/html; charset=utf-8"));
//! # Ok::<(), PageError>(())
//! # }).unwrap();
//! ```

use crate::handler::{Handler, RequestContext};
use crate::http::{Request, Response, StatusCode};
use crate::routing::Router;
use bytes::Bytes;
use std::collections::HashMap;

const RECORDER_REQUEST_ID: &str = "recorded";

/// Captured status, headers and body of one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseRecorder {
    pub code: StatusCode,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a response, replacing anything recorded before.
    pub fn record(&mut self, response: Response) {
        self.code = response.status;
        self.headers = response.headers;
        self.body = response.body.unwrap_or_default();
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

impl From<Response> for ResponseRecorder {
    fn from(response: Response) -> Self {
        let mut rr = Self::new();
        rr.record(response);
        rr
    }
}

/// Invoke a handler directly and record its response.
///
/// A handler error is recorded as the error response it maps to.
pub async fn serve<H: Handler + ?Sized>(handler: &H, request: Request) -> ResponseRecorder {
    let ctx = RequestContext::new(handler.name(), RECORDER_REQUEST_ID);
    let response = match handler.serve(request, &ctx).await {
        Ok(response) => response,
        Err(e) => e.into(),
    };
    response.into()
}

/// Dispatch a request through a router and record the response.
pub async fn serve_router(router: &Router, request: Request) -> ResponseRecorder {
    router.dispatch(request, RECORDER_REQUEST_ID).await.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::PageError;
    use async_trait::async_trait;

    struct NotHere;

    #[async_trait]
    impl Handler for NotHere {
        async fn serve(&self, _: Request, _: &RequestContext) -> Result<Response, PageError> {
            Err(PageError::not_found("gone"))
        }

        fn name(&self) -> &str {
            "not-here"
        }
    }

    #[test]
    fn test_new_recorder_defaults_to_ok() {
        let rr = ResponseRecorder::new();
        assert_eq!(rr.code, StatusCode::OK);
        assert!(rr.headers.is_empty());
        assert!(rr.body.is_empty());
    }

    #[test]
    fn test_record_replaces_previous() {
        let mut rr = ResponseRecorder::new();
        rr.record(Response::text("first"));
        rr.record(Response::error(StatusCode::BAD_REQUEST, "second"));
        assert_eq!(rr.code, StatusCode::BAD_REQUEST);
        assert_eq!(rr.body_string(), "second");
        assert_eq!(rr.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[tokio::test]
    async fn test_serve_records_handler_error() {
        let rr = serve(&NotHere, Request::default()).await;
        assert_eq!(rr.code, StatusCode::NOT_FOUND);
        assert_eq!(rr.body_string(), "gone");
    }
}
