use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{ApiError, Result},
    middleware::TenantIdentity,
    models::credits::{
        CreditsBalanceResponse, TransactionListQuery, TransactionListResponse, TransactionRecord,
        VerifyPaymentRequest, VerifyPaymentResponse,
    },
};

/// GET /api/v1/credits
#[instrument(skip(state, identity))]
pub async fn get_credits(
    State(state): State<AppState>,
    identity: TenantIdentity,
) -> Result<Json<CreditsBalanceResponse>> {
    let account = state
        .credits_service
        .get_account(identity.tenant_id)
        .await?;

    Ok(Json(account.into()))
}

/// GET /api/v1/credits/transactions?page&limit
#[instrument(skip(state, identity))]
pub async fn list_transactions(
    State(state): State<AppState>,
    identity: TenantIdentity,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>> {
    let limit = query
        .limit
        .unwrap_or(state.config.ledger.default_page_size)
        .clamp(1, state.config.ledger.max_page_size);
    let page = query.page.unwrap_or(1).max(1);

    let (entries, total_items, total_pages) = state
        .credits_service
        .list_transactions(identity.tenant_id, page, limit)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: entries.into_iter().map(TransactionRecord::from).collect(),
        page,
        limit,
        total_items,
        total_pages,
    }))
}

/// POST /api/v1/credits/verify-payment
#[instrument(skip(state, identity, request))]
pub async fn verify_payment(
    State(state): State<AppState>,
    identity: TenantIdentity,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>> {
    // Validate request
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let account = state
        .payment_service
        .verify_and_credit(
            identity.tenant_id,
            &request.transaction_ref,
            request.amount,
            request.extracted_amount,
            request.utr_number.as_deref(),
            Some(identity.actor_id),
        )
        .await?;

    Ok(Json(VerifyPaymentResponse {
        balance: account.balance,
    }))
}
