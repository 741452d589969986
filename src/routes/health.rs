use axum::{extract::State, Json};

use crate::{app_state::AppState, error::Result, models::common::MessageResponse};

/// GET /api/v1/health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.db.ping().await?;
    Ok(Json(MessageResponse::new("ok")))
}
