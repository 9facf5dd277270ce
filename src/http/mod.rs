//! HTTP request and response values shared by handlers, the router and the recorder.

mod request;
mod response;

pub use request::{Method, Request};
pub use response::{Response, StatusCode, HTML_CONTENT_TYPE};
