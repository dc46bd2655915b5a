use std::collections::BTreeMap;

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

// Canned preview; per-company insights come from the report service.
const PREVIEW_INSIGHTS: [(&str, &str); 4] = [
    (
        "C1",
        "Your leadership is somewhat confident in AI direction, but alignment is still fragmented.",
    ),
    (
        "A2",
        "You have informal tool adoption but lack centralized guidance or governance.",
    ),
    (
        "R1",
        "AI literacy levels vary across departments, and no formal training exists yet.",
    ),
    (
        "E4",
        "You currently don't have a roadmap for scaling AI company-wide.",
    ),
];

#[derive(Debug, Deserialize)]
pub struct IntakeBody {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub persona: String,
}

#[derive(Debug, Serialize)]
pub struct InsightPreview {
    pub company_name: String,
    pub persona: String,
    pub insights: BTreeMap<String, String>,
}

pub fn preview_insights() -> BTreeMap<String, String> {
    PREVIEW_INSIGHTS
        .iter()
        .map(|(qid, insight)| (qid.to_string(), insight.to_string()))
        .collect()
}

pub async fn submit_intake(Json(body): Json<IntakeBody>) -> AppResult<Json<InsightPreview>> {
    let company_name = body.company_name.trim();
    let persona = body.persona.trim();

    if company_name.is_empty() || persona.is_empty() {
        return Err(AppError::Validation("Please enter all fields.".into()));
    }

    tracing::info!(
        report.company_name = %company_name,
        report.persona = %persona,
        "Intake accepted, returning insight preview"
    );

    Ok(Json(InsightPreview {
        company_name: company_name.to_string(),
        persona: persona.to_string(),
        insights: preview_insights(),
    }))
}
