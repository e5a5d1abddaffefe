//! Request report: one exchange rendered for a terminal and for log ingestion.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use colored::{ColoredString, Colorize};
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::peaker::Priority;
use tabled::settings::{Padding, Style, Width};
use tonic_report_core::{Message, Severity, TERM_WIDTH};

use super::config::ColorChoice;
use super::request::TRACE_CONTEXT_HEADER;
use super::snapshot::Snapshot;

/// Structured field Cloud Logging uses to link an entry to a trace.
pub const TRACE_FIELD: &str = "logging.googleapis.com/trace";

type Rgb = (u8, u8, u8);

const RED: Rgb = (255, 0, 0);
const ORANGE: Rgb = (255, 95, 0);
const BLUE: Rgb = (0, 135, 255);
const YELLOW: Rgb = (255, 215, 0);
const WHITE: Rgb = (255, 255, 255);

/// Timing of one exchange, measured by the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    /// Time spent in the inner service.
    pub latency: Duration,
    /// Wall-clock time the request entered the middleware.
    pub started_at: DateTime<Utc>,
}

/// Log message describing a completed HTTP exchange.
///
/// Borrows everything it renders; build one per request, hand it to a
/// [`Logger`](tonic_report_core::Logger), drop it.
///
/// # Examples
///
/// ```
/// use axum::http::Method;
/// use tonic_report::{ColorChoice, Message, Report, RequestSnapshot};
///
/// let snapshot = RequestSnapshot::new(Method::GET, "/foo");
/// let report = Report::new(None, "", &snapshot).with_color(ColorChoice::Never);
///
/// assert_eq!(report.render_terminal(), "✅ 200 [GET /foo]\n\n");
/// assert_eq!(report.render_structured()["severity"], "INFO");
/// ```
pub struct Report<'a, S: ?Sized> {
    metrics: Option<&'a Metrics>,
    project_id: &'a str,
    snapshot: &'a S,
    color: ColorChoice,
    term_width: usize,
}

impl<'a, S: Snapshot + ?Sized> Report<'a, S> {
    /// Report over `snapshot`. An empty `project_id` disables trace
    /// correlation; `None` metrics omit latency and start time.
    pub fn new(metrics: Option<&'a Metrics>, project_id: &'a str, snapshot: &'a S) -> Self {
        Self {
            metrics,
            project_id,
            snapshot,
            color: ColorChoice::default(),
            term_width: TERM_WIDTH,
        }
    }

    /// Set the terminal styling.
    #[must_use]
    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the query table width.
    #[must_use]
    pub fn with_term_width(mut self, term_width: usize) -> Self {
        self.term_width = term_width;
        self
    }

    /// Severity derived from the response status.
    #[must_use]
    pub fn severity(&self) -> Severity {
        Severity::from_status(self.snapshot.status())
    }

    fn paint(&self, text: String, style: impl FnOnce(&str) -> ColoredString) -> String {
        match self.color {
            ColorChoice::Auto => style(&text).to_string(),
            ColorChoice::Never => text,
        }
    }

    /// Bordered key/value table, keys and each key's values in ascending order.
    /// Exactly `term_width` wide: long values wrap inside their cell.
    fn query_table(&self) -> Option<String> {
        let query = self.snapshot.query();
        if query.is_empty() {
            return None;
        }

        let mut builder = Builder::default();
        for (key, values) in query {
            let mut values: Vec<&str> = values.iter().map(String::as_str).collect();
            values.sort_unstable();

            let key = self.paint(key.clone(), |s| s.truecolor(YELLOW.0, YELLOW.1, YELLOW.2));
            let values = values
                .into_iter()
                .map(|v| self.paint(v.to_string(), |s| s.truecolor(WHITE.0, WHITE.1, WHITE.2)))
                .collect::<Vec<_>>()
                .join("\n");
            builder.push_record([key, values]);
        }

        let mut table = builder.build();
        table
            .with(Style::modern().remove_horizontal())
            .with(Padding::new(2, 1, 0, 0))
            .with(Width::wrap(self.term_width).priority(Priority::max(true)))
            .with(Width::increase(self.term_width));
        Some(table.to_string())
    }

    /// `projects/<id>/traces/<trace>` when a project is set and the trace
    /// header carries a trace id.
    fn trace(&self) -> Option<String> {
        if self.project_id.is_empty() {
            return None;
        }

        let header = self.snapshot.header(TRACE_CONTEXT_HEADER)?;
        let trace_id = header.split('/').next().unwrap_or_default();
        if trace_id.is_empty() {
            return None;
        }

        Some(format!("projects/{}/traces/{trace_id}", self.project_id))
    }
}

impl<S: Snapshot + ?Sized> Message for Report<'_, S> {
    fn render_terminal(&self) -> String {
        let (glyph, (r, g, b)) = match self.severity() {
            Severity::Error => ("🚨 ", RED),
            Severity::Warning => ("⚠ ", ORANGE),
            Severity::Info => ("✅ ", BLUE),
        };

        let snapshot = self.snapshot;
        let mut out = self.paint(format!("{glyph}{}", snapshot.status()), |s| {
            s.truecolor(r, g, b).bold()
        });
        out += &self.paint(
            format!(" [{} {}]", snapshot.method(), snapshot.route_path()),
            |s| s.truecolor(r, g, b),
        );

        if let Some(metrics) = self.metrics {
            out += &self.paint(format!(" ({})", format_latency(metrics.latency)), |s| {
                s.dimmed()
            });
        }

        if let Some(table) = self.query_table() {
            out.push('\n');
            out.push_str(&table);
        }

        for err in snapshot.errors() {
            out.push_str("\n  ");
            out += &self.paint(format!("- {err}"), |s| s.truecolor(RED.0, RED.1, RED.2));
        }

        out.push_str("\n\n");
        out
    }

    fn render_structured(&self) -> Map<String, Value> {
        let snapshot = self.snapshot;

        let mut http_request = Map::new();
        http_request.insert("requestMethod".into(), snapshot.method().into());
        http_request.insert("requestUrl".into(), snapshot.route_path().into());
        http_request.insert("status".into(), snapshot.status().into());
        http_request.insert("userAgent".into(), snapshot.user_agent().into());
        http_request.insert("remoteIp".into(), snapshot.client_ip().into());
        http_request.insert("protocol".into(), snapshot.protocol().into());

        let query: Map<String, Value> = snapshot
            .query()
            .iter()
            .map(|(key, values)| (key.clone(), Value::from(values.clone())))
            .collect();

        let mut output = Map::new();
        output.insert("severity".into(), self.severity().as_str().into());
        output.insert("ip".into(), snapshot.client_ip().into());
        output.insert("contentType".into(), snapshot.content_type().into());
        output.insert("errors".into(), Value::from(snapshot.errors().to_vec()));
        output.insert("query".into(), Value::Object(query));

        if let Some(metrics) = self.metrics {
            output.insert(
                "start".into(),
                metrics
                    .started_at
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true)
                    .into(),
            );
            http_request.insert("latency".into(), format_latency(metrics.latency).into());
        }

        if let Some(trace) = self.trace() {
            output.insert(TRACE_FIELD.into(), trace.into());
        }

        output.insert("httpRequest".into(), Value::Object(http_request));
        output
    }
}

/// `1s`, `250ms`, `1.5s`.
fn format_latency(latency: Duration) -> String {
    format!("{latency:?}")
}
