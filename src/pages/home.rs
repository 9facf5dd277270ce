//! The home page.

use crate::handler::{Handler, PageError, RequestContext};
use crate::http::{Method, Request, Response};
use async_trait::async_trait;
use tracing::debug;

const TEMPLATE: &str = include_str!("home.html");

/// Serves the site's home page as HTML.
///
/// The handler answers GET and HEAD regardless of path; mounting it at
/// `/home` is the router's job.
pub struct HomePage {
    rendered: String,
}

impl HomePage {
    pub fn new(title: impl AsRef<str>) -> Self {
        Self {
            rendered: render(title.as_ref()),
        }
    }

    /// The rendered document served on GET.
    pub fn document(&self) -> &str {
        &self.rendered
    }
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new("Home")
    }
}

#[async_trait]
impl Handler for HomePage {
    async fn serve(&self, request: Request, ctx: &RequestContext) -> Result<Response, PageError> {
        debug!("Serving home page for {} [{}]", request.url, ctx.request_id);

        match request.method {
            Method::Get => Ok(Response::html(self.rendered.as_str())),
            Method::Head => Ok(Response::html(self.rendered.as_str()).without_body()),
            other => Ok(Response::from(PageError::method_not_allowed(format!(
                "{} not allowed",
                other
            )))
            .header("Allow", "GET, HEAD")),
        }
    }

    fn name(&self) -> &str {
        "home"
    }
}

fn render(title: &str) -> String {
    TEMPLATE.replace("{{title}}", &html_escape::encode_safe(title))
}
