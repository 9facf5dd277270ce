//! HTTP request value handed to page handlers.

use crate::handler::PageError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// HTTP method enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// The upper-case method token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method tokens are case-sensitive, so `get` is rejected.
impl FromStr for Method {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "" => Err(PageError::bad_request("empty method")),
            other => Err(PageError::bad_request(format!(
                "unsupported method '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<&hyper::Method> for Method {
    type Error = PageError;

    fn try_from(method: &hyper::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// HTTP request passed to a [`Handler`](crate::handler::Handler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request target, path plus optional query.
    pub url: String,
    /// HTTP headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Bytes>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Build a request from a raw method token and target.
    ///
    /// Fails when the method is unknown or the target is not a valid
    /// origin-form path: it must start with `/`, parse as a URI, and
    /// carry only well-formed `%XX` escapes.
    pub fn build(method: &str, url: &str) -> Result<Self, PageError> {
        let method = method.parse::<Method>()?;
        let invalid = |reason: &str| {
            PageError::bad_request(format!("invalid request target '{}': {}", url, reason))
        };

        if !url.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        url.parse::<hyper::Uri>()
            .map_err(|e| invalid(&e.to_string()))?;
        if !has_valid_escapes(url) {
            return Err(invalid("malformed percent escape"));
        }
        Ok(Self::new(method, url))
    }

    /// Add a header, replacing any header with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn get_header(&self, key: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// The request path without its query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or("/")
    }
}

fn has_valid_escapes(target: &str) -> bool {
    let bytes = target.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

impl Default for Request {
    fn default() -> Self {
        Self::new(Method::Get, "/")
    }
}
