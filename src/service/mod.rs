pub mod http;

pub use http::HttpReportService;

use crate::delivery::{ArtifactRef, RecipientEmail, ReportRequest};

/// The external service that renders reports and mails them out.
#[async_trait::async_trait]
pub trait ReportService: Send + Sync {
    async fn generate(&self, request: &ReportRequest) -> anyhow::Result<ArtifactRef>;

    async fn send_email(
        &self,
        email: &RecipientEmail,
        artifact: &ArtifactRef,
    ) -> anyhow::Result<()>;

    async fn check_health(&self) -> anyhow::Result<()>;

    fn name(&self) -> &str;
}
