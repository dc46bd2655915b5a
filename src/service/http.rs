use std::collections::BTreeMap;
use std::future::Future;
use std::time::Instant;

use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use super::ReportService;
use crate::delivery::{ArtifactRef, RecipientEmail, ReportRequest};
use crate::telemetry::metrics::{REPORT_SERVICE_CALL_DURATION, REPORT_SERVICE_ERROR_COUNT};

pub struct HttpReportService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReportService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<T, F>(&self, operation: &'static str, fut: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        let start = Instant::now();

        let span = tracing::info_span!(
            "report_service.call",
            otel.name = %format!("report_service {operation}"),
            report_service.operation = operation,
            server.address = %self.base_url,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        let result = fut.instrument(span.clone()).await;

        let op_kv = KeyValue::new("report_service.operation", operation);
        REPORT_SERVICE_CALL_DURATION.record(start.elapsed().as_secs_f64(), &[op_kv.clone()]);

        match &result {
            Ok(_) => {
                span.record("otel.status_code", "OK");
            }
            Err(err) => {
                let error_type = classify_error(err);
                span.record("otel.status_code", "ERROR");
                span.record("error.type", error_type);

                REPORT_SERVICE_ERROR_COUNT
                    .add(1, &[op_kv, KeyValue::new("error.type", error_type)]);
            }
        }

        result
    }
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    persona: &'a str,
    company_name: &'a str,
    insights: &'a BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    filepath: String,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email_address: &'a str,
    filepath: &'a str,
}

#[derive(Deserialize)]
struct ServiceError {
    detail: String,
}

async fn ensure_success(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(err) = serde_json::from_str::<ServiceError>(&error_body) {
        return Err(anyhow::anyhow!(
            "report service error ({}): {}",
            status,
            err.detail
        ));
    }
    Err(anyhow::anyhow!(
        "report service error ({}): {}",
        status,
        error_body
    ))
}

#[async_trait::async_trait]
impl ReportService for HttpReportService {
    async fn generate(&self, request: &ReportRequest) -> anyhow::Result<ArtifactRef> {
        let body = GenerateBody {
            persona: &request.persona,
            company_name: &request.company_name,
            insights: &request.insights,
        };

        self.call("generate", async {
            let response = self
                .client
                .post(self.endpoint("/report/generate"))
                .json(&body)
                .send()
                .await?;

            let resp: GenerateResponse = ensure_success(response).await?.json().await?;

            if resp.filepath.trim().is_empty() {
                return Err(anyhow::anyhow!("report service returned an empty filepath"));
            }

            Ok(ArtifactRef::new(resp.filepath))
        })
        .await
    }

    async fn send_email(
        &self,
        email: &RecipientEmail,
        artifact: &ArtifactRef,
    ) -> anyhow::Result<()> {
        let body = EmailBody {
            email_address: email.as_str(),
            filepath: artifact.as_str(),
        };

        self.call("send_email", async {
            let response = self
                .client
                .post(self.endpoint("/email/send"))
                .json(&body)
                .send()
                .await?;

            ensure_success(response).await?;
            Ok(())
        })
        .await
    }

    async fn check_health(&self) -> anyhow::Result<()> {
        self.call("health", async {
            let response = self.client.get(self.endpoint("/")).send().await?;
            ensure_success(response).await?;
            Ok(())
        })
        .await
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn classify_error(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<reqwest::Error>() {
        if e.is_timeout() {
            return "timeout";
        }
        if e.is_connect() {
            return "network_error";
        }
        if e.is_decode() {
            return "invalid_response";
        }
    }

    let msg = err.to_string().to_lowercase();
    if msg.contains("timeout") || msg.contains("timed out") {
        "timeout"
    } else if msg.contains("(400")
        || msg.contains("(404")
        || msg.contains("(422")
        || msg.contains("empty filepath")
    {
        "invalid_request"
    } else if msg.contains("(500") || msg.contains("(502") || msg.contains("(503") {
        "server_error"
    } else if msg.contains("connect") || msg.contains("dns") || msg.contains("reset") {
        "network_error"
    } else {
        "unknown_error"
    }
}
