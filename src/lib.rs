//! # homepage
//!
//! A site home page served over HTTP, plus the pieces needed to run and
//! test it.
//!
//! ```text
//!   TCP ──► SiteServer (hyper, one task per connection)
//!               │
//!               ▼
//!            Router ──► HomePage (/home, /)
//!               ▲
//!   tests ──► recorder::serve_router / recorder::serve (no socket)
//! ```
//!
//! The home page answers `GET` with `200 OK` and
//! `Content-Type: text/html; charset=utf-8`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use homepage::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = SiteConfig::new().port(8080).title("My Site");
//!     SiteServer::new(config).run().await
//! }
//! ```

pub mod handler;
pub mod http;
pub mod pages;
pub mod recorder;
pub mod routing;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::handler::{Handler, PageError, RequestContext};
    pub use crate::http::{Method, Request, Response, StatusCode, HTML_CONTENT_TYPE};
    pub use crate::pages::HomePage;
    pub use crate::recorder::{self, ResponseRecorder};
    pub use crate::routing::{RouteMethod, Router};
    pub use crate::runtime::{SiteConfig, SiteServer};
    pub use async_trait::async_trait;
}

pub use handler::{Handler, PageError, RequestContext};
pub use http::{Request, Response};
pub use runtime::{SiteConfig, SiteServer};
