#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use report_delivery::service::HttpReportService;
use report_delivery::{AppState, Config};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct StubConfig {
    pub generate_status: StatusCode,
    pub generate_body: Value,
    pub email_status: StatusCode,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            generate_status: StatusCode::OK,
            generate_body: json!({"status": "success", "filepath": "reports/ft360.pdf"}),
            email_status: StatusCode::OK,
        }
    }
}

pub struct StubState {
    config: StubConfig,
    pub generate_bodies: Mutex<Vec<Value>>,
    pub email_bodies: Mutex<Vec<Value>>,
}

/// In-process stand-in for the report/email service.
pub struct StubUpstream {
    pub base_url: String,
    pub state: Arc<StubState>,
}

impl StubUpstream {
    pub fn generate_bodies(&self) -> Vec<Value> {
        self.state.generate_bodies.lock().unwrap().clone()
    }

    pub fn email_bodies(&self) -> Vec<Value> {
        self.state.email_bodies.lock().unwrap().clone()
    }
}

async fn generate(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.generate_bodies.lock().unwrap().push(body);
    (
        state.config.generate_status,
        Json(state.config.generate_body.clone()),
    )
}

async fn send_email(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let email = body["email_address"].as_str().unwrap_or_default().to_string();
    state.email_bodies.lock().unwrap().push(body);

    if state.config.email_status.is_success() {
        (
            state.config.email_status,
            Json(json!({"status": "success", "message": format!("Report sent to {email}")})),
        )
    } else {
        (
            state.config.email_status,
            Json(json!({"detail": "Failed to send email."})),
        )
    }
}

pub async fn spawn_upstream(config: StubConfig) -> StubUpstream {
    let state = Arc::new(StubState {
        config,
        generate_bodies: Mutex::default(),
        email_bodies: Mutex::default(),
    });

    let app = Router::new()
        .route(
            "/",
            get(|| async { Json(json!({"status": "OK", "message": "live"})) }),
        )
        .route("/report/generate", post(generate))
        .route("/email/send", post(send_email))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubUpstream {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// Address nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn test_config(report_service_url: &str) -> Config {
    Config {
        port: 0,
        environment: "test".to_string(),
        report_service_url: report_service_url.to_string(),
        artifact_base_url: report_service_url.to_string(),
        otel_service_name: "report-delivery-test".to_string(),
        otel_exporter_endpoint: "http://localhost:4317".to_string(),
    }
}

pub fn app_state(report_service_url: &str) -> AppState {
    AppState {
        config: test_config(report_service_url),
        report_service: Arc::new(HttpReportService::new(report_service_url)),
    }
}
