use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{ApiError, Result},
    middleware::TenantIdentity,
    models::{
        common::FEATURE_MANUAL,
        credits::{AdminCreditRequest, AdminResetRequest, CreditsBalanceResponse},
    },
};

/// POST /api/v1/admin/credits/{tenant_id}
#[instrument(skip(state, identity, request))]
pub async fn admin_credit(
    State(state): State<AppState>,
    identity: TenantIdentity,
    Path(tenant_id): Path<Uuid>,
    Json(request): Json<AdminCreditRequest>,
) -> Result<Json<CreditsBalanceResponse>> {
    identity.require_admin()?;

    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let account = state
        .credits_service
        .credit(
            tenant_id,
            request.amount,
            FEATURE_MANUAL,
            &request.description,
            Some(identity.actor_id),
        )
        .await?;

    Ok(Json(account.into()))
}

/// PUT /api/v1/admin/credits/{tenant_id}
#[instrument(skip(state, identity, request))]
pub async fn admin_reset(
    State(state): State<AppState>,
    identity: TenantIdentity,
    Path(tenant_id): Path<Uuid>,
    Json(request): Json<AdminResetRequest>,
) -> Result<Json<CreditsBalanceResponse>> {
    identity.require_admin()?;

    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let account = state
        .credits_service
        .reset(
            tenant_id,
            request.new_balance,
            &request.description,
            identity.actor_id,
        )
        .await?;

    Ok(Json(account.into()))
}
