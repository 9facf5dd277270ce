//! Route table mapping request paths and methods to handlers.

use crate::handler::{Handler, RequestContext};
use crate::http::{Method, Request, Response, StatusCode};
use crate::pages::HomePage;
use crate::runtime::SiteConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Method a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Any,
}

impl RouteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Delete => "DELETE",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Head => "HEAD",
            RouteMethod::Options => "OPTIONS",
            RouteMethod::Any => "*",
        }
    }

    pub fn matches(&self, method: Method) -> bool {
        match self {
            RouteMethod::Any => true,
            RouteMethod::Get => method == Method::Get,
            RouteMethod::Post => method == Method::Post,
            RouteMethod::Put => method == Method::Put,
            RouteMethod::Delete => method == Method::Delete,
            RouteMethod::Patch => method == Method::Patch,
            RouteMethod::Head => method == Method::Head,
            RouteMethod::Options => method == Method::Options,
        }
    }
}

impl From<Method> for RouteMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => RouteMethod::Get,
            Method::Post => RouteMethod::Post,
            Method::Put => RouteMethod::Put,
            Method::Delete => RouteMethod::Delete,
            Method::Patch => RouteMethod::Patch,
            Method::Head => RouteMethod::Head,
            Method::Options => RouteMethod::Options,
        }
    }
}

/// A path pattern bound to a handler.
pub struct Route {
    /// Exact path, or a prefix ending in `/*`.
    pub path: String,
    pub method: RouteMethod,
    pub handler: Arc<dyn Handler>,
}

impl Route {
    pub fn matches_path(&self, path: &str) -> bool {
        match self.path.strip_suffix("/*") {
            Some(prefix) => path == prefix || path.starts_with(&format!("{}/", prefix)),
            None => self.path == path,
        }
    }

    pub fn matches(&self, path: &str, method: Method) -> bool {
        self.method.matches(method) && self.matches_path(path)
    }
}

/// Serializable view of a route, used for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub method: RouteMethod,
    pub path: String,
    pub handler: String,
}

/// Ordered route table; the first matching route wins.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// The site's default routes: the home page at `/home` and `/`.
    pub fn site(config: &SiteConfig) -> Self {
        let home: Arc<dyn Handler> = Arc::new(HomePage::new(&config.title));
        Self::new()
            .route(RouteMethod::Any, "/home", home.clone())
            .route(RouteMethod::Any, "/", home)
    }

    /// Register a handler for a method and path pattern.
    pub fn route(
        mut self,
        method: RouteMethod,
        path: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Self {
        let path = path.into();
        info!("Registered route: {:?} {} -> {}", method, path, handler.name());
        self.routes.push(Route {
            path,
            method,
            handler,
        });
        self
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes
            .iter()
            .map(|r| RouteInfo {
                method: r.method,
                path: r.path.clone(),
                handler: r.handler.name().to_string(),
            })
            .collect()
    }

    /// Find the handler for a request, if any.
    pub fn find(&self, path: &str, method: Method) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(path, method))
    }

    /// Route a request and run its handler.
    ///
    /// Never fails: unknown paths become 404, a known path with the wrong
    /// method becomes 405, and handler errors become their error response.
    pub async fn dispatch(&self, request: Request, request_id: &str) -> Response {
        let path = request.path().to_string();
        let method = request.method;

        let Some(route) = self.find(&path, method) else {
            let mut allowed: Vec<&str> = Vec::new();
            for r in self.routes.iter().filter(|r| r.matches_path(&path)) {
                if !allowed.contains(&r.method.as_str()) {
                    allowed.push(r.method.as_str());
                }
            }
            if !allowed.is_empty() {
                return Response::error(
                    StatusCode::METHOD_NOT_ALLOWED,
                    format!("{} not allowed on {}", method, path),
                )
                .header("Allow", allowed.join(", "));
            }
            return Response::error(StatusCode::NOT_FOUND, format!("No page at {}", path));
        };

        let ctx = RequestContext::new(route.handler.name(), request_id);
        match route.handler.serve(request, &ctx).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    "Handler '{}' error: {} [{}]",
                    route.handler.name(),
                    e,
                    request_id
                );
                e.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::PageError;
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl Handler for Failing {
        async fn serve(&self, _: Request, _: &RequestContext) -> Result<Response, PageError> {
            Err(PageError::new("boom"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_route_method_matches() {
        assert!(RouteMethod::Get.matches(Method::Get));
        assert!(!RouteMethod::Get.matches(Method::Post));
        assert!(RouteMethod::Any.matches(Method::Delete));
        assert_eq!(RouteMethod::from(Method::Head), RouteMethod::Head);
    }

    #[test]
    fn test_wildcard_path() {
        let route = Route {
            path: "/static/*".to_string(),
            method: RouteMethod::Get,
            handler: Arc::new(Failing),
        };
        assert!(route.matches_path("/static"));
        assert!(route.matches_path("/static/site.css"));
        assert!(!route.matches_path("/statics"));
    }

    #[tokio::test]
    async fn test_dispatch_not_found_and_method() {
        let router = Router::new().route(RouteMethod::Get, "/only-get", Arc::new(Failing));

        let response = router.dispatch(Request::new(Method::Get, "/nope"), "r1").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let response = router
            .dispatch(Request::new(Method::Post, "/only-get"), "r2")
            .await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.get_header("Allow"), Some(&"GET".to_string()));
    }

    #[tokio::test]
    async fn test_method_not_allowed_lists_every_method() {
        let router = Router::new()
            .route(RouteMethod::Get, "/form", Arc::new(Failing))
            .route(RouteMethod::Head, "/form", Arc::new(Failing))
            .route(RouteMethod::Get, "/form", Arc::new(Failing))
            .route(RouteMethod::Post, "/other", Arc::new(Failing));

        let response = router
            .dispatch(Request::new(Method::Delete, "/form"), "r4")
            .await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.get_header("Allow"), Some(&"GET, HEAD".to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_converts_handler_error() {
        let router = Router::new().route(RouteMethod::Any, "/fail", Arc::new(Failing));
        let response = router.dispatch(Request::new(Method::Get, "/fail"), "r3").await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text_body(), Some("boom".to_string()));
    }

    #[test]
    fn test_site_routes() {
        let routes = Router::site(&SiteConfig::default()).routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "/home");
        assert_eq!(routes[0].handler, "home");
        assert_eq!(routes[1].path, "/");
    }
}
