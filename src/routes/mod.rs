pub mod deliveries;
pub mod health;
pub mod intake;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/intake", post(intake::submit_intake))
        .route("/api/deliveries", post(deliveries::create_delivery))
        .with_state(state)
}
