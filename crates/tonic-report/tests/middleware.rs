//! End-to-end tests: an Axum router wrapped in [`ReportLayer`], driven with
//! `oneshot`, reporting into a recording logger.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::Path;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{Map, Value};
use tower::ServiceExt;

use tonic_report::{
    handle_error, ColorChoice, HttpExchange, Logger, Message, ReportConfig, ReportLayer, Severity,
    TRACE_FIELD,
};

struct Record {
    severity: Severity,
    terminal: String,
    structured: Map<String, Value>,
}

#[derive(Default)]
struct RecordingLogger {
    records: Mutex<Vec<Record>>,
}

impl RecordingLogger {
    fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock().unwrap())
    }
}

impl Logger for RecordingLogger {
    fn log(&self, severity: Severity, message: &dyn Message) {
        self.records.lock().unwrap().push(Record {
            severity,
            terminal: message.render_terminal(),
            structured: message.render_structured(),
        });
    }
}

async fn get_user(Path(id): Path<String>) -> Response {
    let result: Result<&str, tonic::Status> = match id.as_str() {
        "42" => Ok("arthur"),
        "0" => Err(tonic::Status::invalid_argument("id must be positive")),
        _ => Err(tonic::Status::not_found(format!("user {id}"))),
    };

    let mut exchange = HttpExchange::new();
    match result {
        Ok(name) => name.into_response(),
        Err(err) => {
            handle_error(&mut exchange, Some(err));
            exchange.into_response()
        }
    }
}

async fn broken() -> Response {
    let mut exchange = HttpExchange::new();
    handle_error(&mut exchange, Some(std::io::Error::other("connection reset")));
    exchange.into_response()
}

async fn with_status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

fn app(logger: Arc<RecordingLogger>, project_id: &str) -> Router {
    let config = ReportConfig::new(project_id).with_color(ColorChoice::Never);
    Router::new()
        .route("/users/{id}", get(get_user))
        .route("/broken", get(broken))
        .route("/status/{code}", get(with_status))
        .layer(ReportLayer::from_config(logger, config))
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

#[tokio::test]
async fn success_is_reported_at_info() {
    let logger = Arc::new(RecordingLogger::default());
    let request = Request::builder()
        .uri("/users/42?b=2&a=1&a=0")
        .header("user-agent", "Netscape")
        .header("x-real-ip", "127.0.0.1")
        .header("content-type", "application/json")
        .header("x-cloud-trace-context", "abcdefg/hijklmnop")
        .body(Body::empty())
        .unwrap();

    let response = send(app(logger.clone(), "cd"), request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let records = logger.take();
    assert_eq!(records.len(), 1);
    let record = &records[0];

    assert_eq!(record.severity, Severity::Info);
    assert!(
        record.terminal.starts_with("✅ 200 [GET /users/{id}] ("),
        "{}",
        record.terminal,
    );

    let fields = &record.structured;
    assert_eq!(fields["severity"], "INFO");
    assert_eq!(fields["ip"], "127.0.0.1");
    assert_eq!(fields["contentType"], "application/json");
    assert_eq!(fields["errors"], Value::Array(Vec::new()));
    assert_eq!(
        fields["query"],
        serde_json::json!({ "a": ["1", "0"], "b": ["2"] })
    );
    assert_eq!(fields[TRACE_FIELD], "projects/cd/traces/abcdefg");
    assert!(fields["start"].is_string());

    let http_request = &fields["httpRequest"];
    assert_eq!(http_request["requestMethod"], "GET");
    assert_eq!(http_request["requestUrl"], "/users/{id}");
    assert_eq!(http_request["status"], 200);
    assert_eq!(http_request["userAgent"], "Netscape");
    assert_eq!(http_request["remoteIp"], "127.0.0.1");
    assert_eq!(http_request["protocol"], "HTTP/1.1");
    assert!(http_request["latency"].is_string());
}

#[tokio::test]
async fn severity_follows_status_class() {
    let cases: &[(u16, Severity)] = &[
        (200, Severity::Info),
        (302, Severity::Info),
        (400, Severity::Warning),
        (429, Severity::Warning),
        (500, Severity::Error),
        (504, Severity::Error),
    ];

    for (code, expected) in cases {
        let logger = Arc::new(RecordingLogger::default());
        let request = Request::builder()
            .uri(format!("/status/{code}"))
            .body(Body::empty())
            .unwrap();

        let response = send(app(logger.clone(), "hello-world"), request).await;
        assert_eq!(response.status().as_u16(), *code);

        let records = logger.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, *expected, "status {code}");
    }
}

#[tokio::test]
async fn rpc_failure_is_translated_and_reported() {
    let logger = Arc::new(RecordingLogger::default());
    let request = Request::builder()
        .uri("/users/7")
        .body(Body::empty())
        .unwrap();

    let response = send(app(logger.clone(), ""), request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], 404);
    assert_eq!(body["error"]["message"], "user 7");
    assert_eq!(body["error"]["status"], "NOT_FOUND");

    let records = logger.take();
    let record = &records[0];
    assert_eq!(record.severity, Severity::Warning);
    assert!(record.terminal.starts_with("⚠ 404 [GET /users/{id}]"));
    assert!(
        record.terminal.ends_with("\n  - NOT_FOUND: user 7\n\n"),
        "{}",
        record.terminal,
    );
    assert_eq!(
        record.structured["errors"],
        serde_json::json!(["NOT_FOUND: user 7"])
    );
    assert!(record.structured.get(TRACE_FIELD).is_none());
}

#[tokio::test]
async fn invalid_argument_is_unprocessable() {
    let logger = Arc::new(RecordingLogger::default());
    let request = Request::builder()
        .uri("/users/0")
        .body(Body::empty())
        .unwrap();

    let response = send(app(logger.clone(), ""), request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(logger.take()[0].severity, Severity::Warning);
}

#[tokio::test]
async fn generic_failure_is_internal_error() {
    let logger = Arc::new(RecordingLogger::default());
    let request = Request::builder()
        .uri("/broken")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .body(Body::empty())
        .unwrap();

    let response = send(app(logger.clone(), ""), request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let records = logger.take();
    let record = &records[0];
    assert_eq!(record.severity, Severity::Error);
    assert!(record.terminal.starts_with("🚨 500 [GET /broken]"));
    assert_eq!(
        record.structured["errors"],
        serde_json::json!(["connection reset"])
    );
    assert_eq!(record.structured["ip"], "203.0.113.9");
}

#[tokio::test]
async fn unmatched_route_reports_request_path() {
    let logger = Arc::new(RecordingLogger::default());
    let request = Request::builder()
        .uri("/nowhere")
        .body(Body::empty())
        .unwrap();

    let response = send(app(logger.clone(), ""), request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let records = logger.take();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].structured["httpRequest"]["requestUrl"], "/nowhere");
}

#[test]
fn layer_exposes_config() {
    let layer = ReportLayer::new(RecordingLogger::default(), "cd");
    assert_eq!(layer.config().project_id, "cd");
    assert!(format!("{layer:?}").contains("ReportLayer"));
}
