use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::AppState;
use crate::delivery::{Delivery, RecipientEmail, ReportDeliveryFlow, ReportRequest};
use crate::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct CreateDeliveryBody {
    pub persona: String,
    pub company_name: String,
    #[serde(default)]
    pub insights: BTreeMap<String, String>,
    pub email_address: String,
}

pub async fn create_delivery(
    State(state): State<AppState>,
    Json(body): Json<CreateDeliveryBody>,
) -> AppResult<Json<Delivery>> {
    let email = RecipientEmail::try_from(body.email_address)?;

    let request = ReportRequest {
        persona: body.persona,
        company_name: body.company_name,
        insights: body.insights,
    };

    let mut flow = ReportDeliveryFlow::new(
        state.report_service.clone(),
        state.config.artifact_base_url.clone(),
    );
    let delivery = flow.deliver(&request, &email).await?;

    Ok(Json(delivery))
}
