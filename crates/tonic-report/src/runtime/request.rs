//! Request-side facts captured before the handler runs.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, MatchedPath};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Method, StatusCode, Version};

use super::snapshot::{parse_query, RequestSnapshot};

/// Headers consulted, in order, to resolve the client IP behind proxies.
///
/// For `x-forwarded-for` only the first (left-most) address is used. When none
/// is present the peer address from [`ConnectInfo`] is used instead.
pub const CLIENT_IP_HEADERS: &[&str] = &["x-forwarded-for", "x-real-ip"];

/// Cloud Trace propagation header read for log correlation.
pub const TRACE_CONTEXT_HEADER: &str = "x-cloud-trace-context";

/// Resolve the client IP from proxy headers, falling back to `peer`.
///
/// Returns an empty string when nothing is known.
///
/// # Examples
///
/// ```
/// use axum::http::HeaderMap;
/// use tonic_report::client_ip;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
/// assert_eq!(client_ip(&headers, None), "203.0.113.7");
///
/// let peer = "192.0.2.1:4711".parse().ok();
/// assert_eq!(client_ip(&HeaderMap::new(), peer), "192.0.2.1");
/// ```
#[must_use]
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    for &name in CLIENT_IP_HEADERS {
        let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) else {
            continue;
        };
        let first = value.split(',').next().unwrap_or_default().trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string()).unwrap_or_default()
}

/// `Content-Type` without parameters (`application/json; charset=utf-8`
/// becomes `application/json`).
pub(crate) fn media_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split([';', ' ']).next())
        .unwrap_or_default()
        .trim()
}

/// Display name of an HTTP version (`HTTP/1.1`).
pub(crate) fn protocol_name(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "HTTP/0.9"
    } else if version == Version::HTTP_10 {
        "HTTP/1.0"
    } else if version == Version::HTTP_2 {
        "HTTP/2.0"
    } else if version == Version::HTTP_3 {
        "HTTP/3.0"
    } else {
        "HTTP/1.1"
    }
}

/// Everything about the request the report needs, copied out of the request
/// before it is handed to the inner service.
#[derive(Debug, Clone)]
pub(crate) struct RequestView {
    method: Method,
    route_path: String,
    raw_query: String,
    headers: HeaderMap,
    client_ip: String,
    version: Version,
}

impl RequestView {
    pub(crate) fn capture(parts: &Parts) -> Self {
        let route_path = parts.extensions.get::<MatchedPath>().map_or_else(
            || parts.uri.path().to_string(),
            |matched| matched.as_str().to_string(),
        );
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            method: parts.method.clone(),
            route_path,
            raw_query: parts.uri.query().unwrap_or_default().to_string(),
            headers: parts.headers.clone(),
            client_ip: client_ip(&parts.headers, peer),
            version: parts.version,
        }
    }

    /// Combine with the response outcome.
    pub(crate) fn into_snapshot(self, status: StatusCode, errors: Vec<String>) -> RequestSnapshot {
        RequestSnapshot::new(self.method, self.route_path)
            .with_status(status)
            .with_query(parse_query(&self.raw_query))
            .with_headers(self.headers)
            .with_client_ip(self.client_ip)
            .with_version(self.version)
            .with_errors(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Snapshot;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn client_ip_headers_contains_expected_entries() {
        assert_eq!(CLIENT_IP_HEADERS, ["x-forwarded-for", "x-real-ip"]);
    }

    #[test]
    fn client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", " 1.2.3.4 , 5.6.7.8".parse().unwrap());
        headers.insert("x-real-ip", "9.9.9.9".parse().unwrap());
        assert_eq!(client_ip(&headers, None), "1.2.3.4");
    }

    #[test]
    fn client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "127.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers, None), "127.0.0.1");
    }

    #[test]
    fn client_ip_skips_empty_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "".parse().unwrap());
        headers.insert("x-real-ip", "127.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers, None), "127.0.0.1");
    }

    #[test]
    fn client_ip_unknown_is_empty() {
        assert_eq!(client_ip(&HeaderMap::new(), None), "");
    }

    #[test]
    fn media_type_strips_parameters() {
        let mut headers = HeaderMap::new();
        assert_eq!(media_type(&headers), "");

        headers.insert(header::CONTENT_TYPE, "text/html; charset=utf-8".parse().unwrap());
        assert_eq!(media_type(&headers), "text/html");

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(media_type(&headers), "application/json");
    }

    #[test]
    fn protocol_names() {
        assert_eq!(protocol_name(Version::HTTP_10), "HTTP/1.0");
        assert_eq!(protocol_name(Version::HTTP_11), "HTTP/1.1");
        assert_eq!(protocol_name(Version::HTTP_2), "HTTP/2.0");
    }

    #[test]
    fn capture_without_matched_path_uses_uri_path() {
        let parts = parts(
            Request::builder()
                .method(Method::DELETE)
                .uri("/users/42?force=true&force=false")
                .header("x-real-ip", "10.1.1.1")
                .header("content-type", "application/json"),
        );

        let snapshot = RequestView::capture(&parts)
            .into_snapshot(StatusCode::NO_CONTENT, vec!["late".to_string()]);

        assert_eq!(snapshot.method(), "DELETE");
        assert_eq!(snapshot.route_path(), "/users/42");
        assert_eq!(snapshot.status(), 204);
        assert_eq!(snapshot.query()["force"], ["true", "false"]);
        assert_eq!(snapshot.client_ip(), "10.1.1.1");
        assert_eq!(snapshot.content_type(), "application/json");
        assert_eq!(snapshot.errors(), ["late"]);
    }

    #[test]
    fn capture_uses_connect_info_peer() {
        let mut parts = parts(Request::builder().uri("/"));
        let peer: SocketAddr = "192.0.2.10:5000".parse().unwrap();
        parts.extensions.insert(ConnectInfo(peer));

        let snapshot = RequestView::capture(&parts).into_snapshot(StatusCode::OK, Vec::new());
        assert_eq!(snapshot.client_ip(), "192.0.2.10");
    }
}
