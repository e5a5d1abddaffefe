//! Tower layer that reports every exchange to a [`Logger`].

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::Request;
use axum::response::Response;
use chrono::Utc;
use futures::future::BoxFuture;
use tonic_report_core::Logger;
use tower::{Layer, Service};

use super::config::ReportConfig;
use super::exchange::ReportedErrors;
use super::report::{Metrics, Report};
use super::request::RequestView;

/// Middleware factory: wraps a service so each completed request is logged as
/// a [`Report`].
///
/// The report is emitted after the inner service returns, at the severity
/// derived from the response status. Errors attached through
/// [`HttpExchange`](crate::HttpExchange) (or any [`ReportedErrors`] response
/// extension) are listed in it.
///
/// Apply with `Router::layer` so the matched route pattern is reported
/// instead of the raw path.
///
/// # Examples
///
/// ```
/// use axum::{routing::get, Router};
/// use tonic_report::{RenderFormat, ReportLayer, TracingLogger};
///
/// let app: Router = Router::new()
///     .route("/users/{id}", get(|| async { "ok" }))
///     .layer(ReportLayer::new(TracingLogger::new(RenderFormat::Json), "my-gcp-project"));
/// ```
#[derive(Clone)]
pub struct ReportLayer {
    logger: Arc<dyn Logger>,
    config: Arc<ReportConfig>,
}

impl ReportLayer {
    /// Report to `logger`, correlating traces with `project_id` (empty
    /// disables correlation).
    pub fn new(logger: impl Logger + 'static, project_id: impl Into<String>) -> Self {
        Self::from_config(logger, ReportConfig::new(project_id))
    }

    /// Report to `logger` with full configuration.
    pub fn from_config(logger: impl Logger + 'static, config: ReportConfig) -> Self {
        Self {
            logger: Arc::new(logger),
            config: Arc::new(config),
        }
    }

    /// The configuration reports are rendered with.
    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }
}

impl std::fmt::Debug for ReportLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportLayer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for ReportLayer {
    type Service = ReportService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ReportService {
            inner,
            logger: Arc::clone(&self.logger),
            config: Arc::clone(&self.config),
        }
    }
}

/// Service produced by [`ReportLayer`].
#[derive(Clone)]
pub struct ReportService<S> {
    inner: S,
    logger: Arc<dyn Logger>,
    config: Arc<ReportConfig>,
}

impl<S> Service<Request> for ReportService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let started_at = Utc::now();
        let start = Instant::now();

        let (parts, body) = request.into_parts();
        let view = RequestView::capture(&parts);
        let request = Request::from_parts(parts, body);

        // Call the instance that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let logger = Arc::clone(&self.logger);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let response = inner.call(request).await?;

            let metrics = Metrics {
                latency: start.elapsed(),
                started_at,
            };
            let errors = response
                .extensions()
                .get::<ReportedErrors>()
                .map(|reported| reported.as_slice().to_vec())
                .unwrap_or_default();
            let snapshot = view.into_snapshot(response.status(), errors);

            let report = Report::new(Some(&metrics), &config.project_id, &snapshot)
                .with_color(config.color)
                .with_term_width(config.term_width);
            logger.log(report.severity(), &report);

            Ok(response)
        })
    }
}
