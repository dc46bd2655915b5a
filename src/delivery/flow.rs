use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use super::model::{ArtifactRef, DeliveryState, RecipientEmail, ReportRequest};
use crate::service::ReportService;
use crate::telemetry::metrics::{DELIVERY_ATTEMPTS, DELIVERY_DURATION};

/// The only failure text ever shown to the user.
pub const GENERIC_FAILURE_NOTICE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Report generation failed: {0}")]
    Generation(String),

    #[error("Report delivery failed: {0}")]
    Delivery(String),
}

impl DeliveryError {
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_NOTICE
    }

    fn outcome(&self) -> &'static str {
        match self {
            DeliveryError::Generation(_) => "generation_failed",
            DeliveryError::Delivery(_) => "delivery_failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    pub id: Uuid,
    pub state: DeliveryState,
    pub artifact: ArtifactRef,
    pub download_url: String,
    pub recipient: RecipientEmail,
    pub delivered_at: DateTime<Utc>,
}

/// Generates a report through the [`ReportService`] and then mails it,
/// tracking progress in a single [`DeliveryState`].
///
/// `deliver` borrows the flow mutably, so one instance never runs two
/// deliveries at once. Observers that render a loading indicator can
/// [`subscribe`](Self::subscribe) to state changes.
pub struct ReportDeliveryFlow {
    service: Arc<dyn ReportService>,
    artifact_base_url: String,
    state: Arc<watch::Sender<DeliveryState>>,
    artifact: Option<ArtifactRef>,
    notices: Vec<&'static str>,
}

impl ReportDeliveryFlow {
    pub fn new(service: Arc<dyn ReportService>, artifact_base_url: impl Into<String>) -> Self {
        let (state, _) = watch::channel(DeliveryState::Idle);

        Self {
            service,
            artifact_base_url: artifact_base_url.into(),
            state: Arc::new(state),
            artifact: None,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> DeliveryState {
        *self.state.borrow()
    }

    pub fn is_in_progress(&self) -> bool {
        self.state().is_in_progress()
    }

    pub fn subscribe(&self) -> watch::Receiver<DeliveryState> {
        self.state.subscribe()
    }

    /// Last artifact obtained from generation. Survives a failed send and is
    /// only replaced by a later successful generation.
    pub fn artifact(&self) -> Option<&ArtifactRef> {
        self.artifact.as_ref()
    }

    /// Download link, exposed only once the report has been delivered.
    pub fn download_url(&self) -> Option<String> {
        if self.state() != DeliveryState::Delivered {
            return None;
        }
        self.artifact
            .as_ref()
            .map(|artifact| artifact.download_url(&self.artifact_base_url))
    }

    /// User-facing notices raised by the most recent `deliver` call.
    pub fn notices(&self) -> &[&'static str] {
        &self.notices
    }

    #[tracing::instrument(
        name = "delivery flow",
        skip(self, request, email),
        fields(
            delivery.id,
            report.company_name = %request.company_name,
            report.persona = %request.persona,
            report.insights_count = request.insights.len(),
            delivery.state,
            delivery.duration_ms,
        )
    )]
    pub async fn deliver(
        &mut self,
        request: &ReportRequest,
        email: &RecipientEmail,
    ) -> Result<Delivery, DeliveryError> {
        let id = Uuid::new_v4();
        let start = Instant::now();
        let span = tracing::Span::current();
        span.record("delivery.id", id.to_string());

        self.notices.clear();

        let _cancel_guard = CancelGuard {
            state: self.state.clone(),
            start,
        };

        let result = self.run(request, email).await;
        let duration = start.elapsed();

        let outcome = match result {
            Ok(artifact) => {
                self.transition(DeliveryState::Delivered);

                let download_url = artifact.download_url(&self.artifact_base_url);
                tracing::info!(
                    artifact = %artifact,
                    download_url = %download_url,
                    "Report delivered"
                );

                DELIVERY_ATTEMPTS.add(1, &[KeyValue::new("delivery.outcome", "delivered")]);

                Ok(Delivery {
                    id,
                    state: DeliveryState::Delivered,
                    artifact,
                    download_url,
                    recipient: email.clone(),
                    delivered_at: Utc::now(),
                })
            }
            Err(err) => {
                self.transition(DeliveryState::Failed);

                tracing::error!(error = %err, "Error generating or sending report");
                self.notices.push(err.user_message());

                DELIVERY_ATTEMPTS.add(1, &[KeyValue::new("delivery.outcome", err.outcome())]);

                Err(err)
            }
        };

        debug_assert!(self.state().is_terminal());
        record_duration(duration);
        span.record("delivery.state", self.state().as_str());
        span.record("delivery.duration_ms", duration.as_millis() as u64);

        outcome
    }

    async fn run(
        &mut self,
        request: &ReportRequest,
        email: &RecipientEmail,
    ) -> Result<ArtifactRef, DeliveryError> {
        // Step 1: generate the report artifact
        self.transition(DeliveryState::Generating);
        let artifact = self
            .service
            .generate(request)
            .await
            .map_err(|e| DeliveryError::Generation(format!("{e:#}")))?;
        self.artifact = Some(artifact.clone());

        // Step 2: mail it to the recipient
        self.transition(DeliveryState::Sending);
        self.service
            .send_email(email, &artifact)
            .await
            .map_err(|e| DeliveryError::Delivery(format!("{e:#}")))?;

        Ok(artifact)
    }

    fn transition(&self, next: DeliveryState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(from = %previous, to = %next, "delivery state transition");
    }
}

fn record_duration(duration: Duration) {
    DELIVERY_DURATION.record(duration.as_secs_f64(), &[]);
}

/// Moves a delivery whose future was dropped mid-call (request timeout,
/// client disconnect) to `Failed`, so the in-progress flag never sticks.
struct CancelGuard {
    state: Arc<watch::Sender<DeliveryState>>,
    start: Instant,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        let current = *self.state.borrow();
        if !current.is_in_progress() {
            return;
        }

        self.state.send_replace(DeliveryState::Failed);
        tracing::warn!(from = %current, "Delivery cancelled before completion");

        DELIVERY_ATTEMPTS.add(1, &[KeyValue::new("delivery.outcome", "cancelled")]);
        record_duration(self.start.elapsed());
    }
}
