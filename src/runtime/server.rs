//! Site HTTP server.

use crate::handler::PageError;
use crate::http::{Method, Request, Response, StatusCode};
use crate::routing::Router;
use crate::runtime::SiteConfig;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// HTTP server that dispatches every request through the site [`Router`].
pub struct SiteServer {
    config: SiteConfig,
    router: Arc<Router>,
}

impl SiteServer {
    /// Create a server with the site's default routes.
    pub fn new(config: SiteConfig) -> Self {
        let router = Router::site(&config);
        Self::with_router(config, router)
    }

    /// Create a server with a custom router.
    pub fn with_router(config: SiteConfig, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    /// Bind the configured address and serve until an accept error.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Site server listening on {}", listener.local_addr()?);

        let router = self.router.clone();
        let config = Arc::new(self.config);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let router = router.clone();
            let config = config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let router = router.clone();
                    let config = config.clone();
                    async move { handle_request(req, router, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

async fn handle_request(
    req: hyper::Request<Incoming>,
    router: Arc<Router>,
    config: Arc<SiteConfig>,
    remote_addr: SocketAddr,
) -> Result<hyper::Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();
    let request_id = generate_request_id();

    debug!(
        "Handling request: {} {} from {} [{}]",
        req.method(),
        path,
        remote_addr,
        request_id
    );

    if config.enable_health && path == "/_health" {
        return Ok(build_response(Response::text("OK")));
    }

    if config.enable_routes && path == "/_routes" {
        let listing = Response::json(&router.routes())
            .unwrap_or_else(|e| PageError::from(e).into());
        return Ok(build_response(listing));
    }

    let request = match convert_request(req, &config).await {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected request {} [{}]: {}", path, request_id, e);
            return Ok(build_response(e.into()));
        }
    };

    Ok(build_response(router.dispatch(request, &request_id).await))
}

async fn convert_request(
    req: hyper::Request<Incoming>,
    config: &SiteConfig,
) -> Result<Request, PageError> {
    let method = Method::try_from(req.method())
        .map_err(|e| PageError::with_code(501, e.message))?;
    let url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let declared = req
        .headers()
        .get(hyper::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > config.max_body_size) {
        return Err(body_too_large());
    }

    let body_bytes = Limited::new(req.into_body(), config.max_body_size)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                body_too_large()
            } else {
                PageError::bad_request(e.to_string())
            }
        })?
        .to_bytes();
    let body = if body_bytes.is_empty() {
        None
    } else {
        Some(body_bytes)
    };

    Ok(Request {
        method,
        url,
        headers,
        body,
    })
}

fn body_too_large() -> PageError {
    PageError::with_code(StatusCode::PAYLOAD_TOO_LARGE.0, "Request body too large")
}

fn build_response(response: Response) -> hyper::Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut builder = hyper::Response::builder().status(status);
    for (name, value) in response.headers {
        builder = builder.header(name, value);
    }

    let body = response.body.unwrap_or_default();
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        error!("Failed to build response: {}", e);
        let mut fallback = hyper::Response::new(Full::new(Bytes::from_static(
            b"Internal Server Error",
        )));
        *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_response_copies_headers() {
        let response = build_response(Response::html("<p>x</p>"));
        assert_eq!(response.status(), hyper::StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn test_build_response_invalid_status() {
        let response = build_response(Response::new(StatusCode(42)));
        assert_eq!(response.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_build_response_invalid_header_falls_back() {
        let response = build_response(Response::ok().header("bad header", "x"));
        assert_eq!(response.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
