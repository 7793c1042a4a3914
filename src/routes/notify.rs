use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::mail::{EmailSender, EstablishmentRegistration, SendOutcome};

use super::health_check;

#[derive(Clone)]
pub struct NotifyState {
    pub sender: Arc<EmailSender>,
}

pub fn create_router(state: NotifyState) -> Router<()> {
    Router::new()
        .route("/estabelecimento", post(register_establishment))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Delivery problems surface as `success: false`, never as an error status.
pub async fn register_establishment(
    State(state): State<NotifyState>,
    Json(payload): Json<EstablishmentRegistration>,
) -> Json<SendOutcome> {
    Json(state.sender.register_establishment(payload).await)
}
