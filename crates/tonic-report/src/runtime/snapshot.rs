//! Read-only view over a completed HTTP exchange.

use std::collections::BTreeMap;

use axum::http::{HeaderMap, Method, StatusCode, Version};

use super::request::protocol_name;

/// Multi-valued query parameters, keyed in ascending order.
///
/// Values keep the order in which they appeared in the query string.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// Read accessors the request report needs from an exchange.
///
/// Implemented by [`RequestSnapshot`]; implement it for another HTTP layer to
/// render reports from its own request type.
pub trait Snapshot {
    /// Request method (`GET`, `POST`, ...).
    fn method(&self) -> &str;

    /// Matched route pattern, or the request path when no route matched.
    fn route_path(&self) -> &str;

    /// Response status code.
    fn status(&self) -> u16;

    /// Decoded query parameters.
    fn query(&self) -> &QueryParams;

    /// Value of a request header, if present and valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;

    /// Media type of the request body, parameters stripped.
    fn content_type(&self) -> &str;

    /// Resolved client IP address, empty if unknown.
    fn client_ip(&self) -> &str;

    /// `User-Agent` header, empty if absent.
    fn user_agent(&self) -> &str {
        self.header("user-agent").unwrap_or_default()
    }

    /// Protocol version (`HTTP/1.1`, `HTTP/2.0`, ...).
    fn protocol(&self) -> &str;

    /// Errors handlers attached to the exchange, in order.
    fn errors(&self) -> &[String];
}

/// Owned [`Snapshot`] of one request and its response status.
///
/// Built by the [`ReportLayer`](crate::ReportLayer) after the inner service
/// returns; can also be assembled by hand.
///
/// # Examples
///
/// ```
/// use axum::http::{Method, StatusCode};
/// use tonic_report::{RequestSnapshot, Snapshot};
///
/// let snapshot = RequestSnapshot::new(Method::GET, "/foo")
///     .with_status(StatusCode::NOT_FOUND)
///     .with_query_string("b=2&a=1&a=0");
///
/// assert_eq!(snapshot.status(), 404);
/// assert_eq!(snapshot.query()["a"], ["1", "0"]);
/// ```
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    method: Method,
    route_path: String,
    status: StatusCode,
    query: QueryParams,
    headers: HeaderMap,
    content_type: String,
    client_ip: String,
    version: Version,
    errors: Vec<String>,
}

impl RequestSnapshot {
    /// Snapshot of a `200 OK` exchange with no query, headers, or errors.
    pub fn new(method: Method, route_path: impl Into<String>) -> Self {
        Self {
            method,
            route_path: route_path.into(),
            status: StatusCode::OK,
            query: QueryParams::new(),
            headers: HeaderMap::new(),
            content_type: String::new(),
            client_ip: String::new(),
            version: Version::HTTP_11,
            errors: Vec::new(),
        }
    }

    /// Set the response status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Replace the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Decode and replace the query parameters from a raw query string.
    #[must_use]
    pub fn with_query_string(self, raw: &str) -> Self {
        self.with_query(parse_query(raw))
    }

    /// Replace the request headers.
    ///
    /// Also derives the content type from `Content-Type`.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.content_type = super::request::media_type(&headers).to_string();
        self.headers = headers;
        self
    }

    /// Set the resolved client IP.
    #[must_use]
    pub fn with_client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = client_ip.into();
        self
    }

    /// Set the protocol version.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Replace the attached errors.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }
}

impl Snapshot for RequestSnapshot {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn route_path(&self) -> &str {
        &self.route_path
    }

    fn status(&self) -> u16 {
        self.status.as_u16()
    }

    fn query(&self) -> &QueryParams {
        &self.query
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn client_ip(&self) -> &str {
        &self.client_ip
    }

    fn protocol(&self) -> &str {
        protocol_name(self.version)
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Decode an `application/x-www-form-urlencoded` query string.
///
/// Repeated keys collect every value in order of appearance.
///
/// ```
/// let query = tonic_report::parse_query("foo=bar&foo=qux&bar=baz%20qux");
/// assert_eq!(query["foo"], ["bar", "qux"]);
/// assert_eq!(query["bar"], ["baz qux"]);
/// ```
#[must_use]
pub fn parse_query(raw: &str) -> QueryParams {
    let mut query = QueryParams::new();
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        query
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    query
}
