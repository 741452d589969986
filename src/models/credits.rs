use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::credit_transactions_ext::CreditTransactionExt;

/// GET /api/v1/credits response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsBalanceResponse {
    pub balance: i64,
    pub total_added: i64,
    pub total_used: i64,
    pub updated_at: time::OffsetDateTime,
}

impl From<entity::credit_accounts::Model> for CreditsBalanceResponse {
    fn from(account: entity::credit_accounts::Model) -> Self {
        Self {
            balance: account.balance,
            total_added: account.total_added,
            total_used: account.total_used,
            updated_at: account.updated_at,
        }
    }
}

/// Single ledger entry as returned by the transaction listing
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: uuid::Uuid,
    pub kind: String,
    pub amount: i64,
    pub balance_after: i64,
    pub feature: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<uuid::Uuid>,
    pub created_at: time::OffsetDateTime,
}

impl From<entity::credit_transactions::Model> for TransactionRecord {
    fn from(entry: entity::credit_transactions::Model) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            amount: entry.amount,
            balance_after: entry.balance_after,
            feature: entry.feature,
            description: entry.description,
            payment_ref: entry.payment_ref,
            order_id: entry.order_id,
            created_at: entry.created_at,
        }
    }
}

/// GET /api/v1/credits/transactions query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// GET /api/v1/credits/transactions response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionRecord>,
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// POST /api/v1/credits/verify-payment request
///
/// `transaction_ref` is the external payment reference used as the
/// idempotency key. `extracted_amount`, when the upstream verifier supplies
/// one, is cross-checked against the claimed `amount` before any mutation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1, max = 255))]
    pub transaction_ref: String,

    #[validate(range(min = 1))]
    pub amount: i64,

    #[validate(length(max = 64))]
    pub utr_number: Option<String>,

    pub extracted_amount: Option<i64>,
}

/// POST /api/v1/credits/verify-payment response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub balance: i64,
}

/// POST /api/v1/admin/credits/{tenant_id} request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreditRequest {
    #[validate(range(min = 1))]
    pub amount: i64,

    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

/// PUT /api/v1/admin/credits/{tenant_id} request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminResetRequest {
    #[validate(range(min = 0))]
    pub new_balance: i64,

    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

/// Replay a tenant's ledger entries (oldest first) and return the balance
/// they reproduce. Used by reconciliation tooling and tests.
pub fn replay_balance(entries: &[entity::credit_transactions::Model]) -> i64 {
    entries.iter().map(|e| e.signed_amount()).sum()
}
