use crate::{
    error::{ApiError, Result},
    models::common::FEATURE_PAYMENT,
    services::CreditsService,
};
use sea_orm::{entity::*, query::*, DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Idempotent crediting of externally verified payments.
///
/// The external payment reference is the idempotency key: a reference is
/// credited at most once per tenant no matter how often the webhook or a
/// retried client request replays it. Dedup runs against the dedicated
/// `payment_ref` ledger column (unique per tenant), never against the
/// free-text description.
pub struct PaymentService {
    db: DatabaseConnection,
    credits: Arc<CreditsService>,
}

impl PaymentService {
    pub fn new(db: DatabaseConnection, credits: Arc<CreditsService>) -> Self {
        Self { db, credits }
    }

    /// Credit a verified payment exactly once.
    ///
    /// `claimed_amount` comes from the caller, `extracted_amount` from the
    /// upstream verifier when it detected one independently; both are
    /// untrusted input and must agree before the ledger is touched.
    #[instrument(skip(self))]
    pub async fn verify_and_credit(
        &self,
        tenant_id: Uuid,
        payment_ref: &str,
        claimed_amount: i64,
        extracted_amount: Option<i64>,
        utr_number: Option<&str>,
        actor_id: Option<Uuid>,
    ) -> Result<entity::credit_accounts::Model> {
        if claimed_amount <= 0 {
            return Err(ApiError::BadRequest(
                "Payment amount must be positive".to_string(),
            ));
        }

        if let Some(extracted) = extracted_amount {
            if extracted != claimed_amount {
                warn!(
                    "Rejected payment {}: claimed {} but verifier detected {}",
                    payment_ref, claimed_amount, extracted
                );
                return Err(ApiError::AmountMismatch(format!(
                    "Claimed amount {} does not match detected amount {}",
                    claimed_amount, extracted
                )));
            }
        }

        let txn = self.db.begin().await?;

        // The exclusive account lock serializes all mutations for this
        // tenant, so the dedup lookup and the credit below cannot race a
        // concurrent call with the same reference. The unique index on
        // (tenant_id, payment_ref) backstops the constraint at the schema
        // level.
        let account = self.credits.find_and_lock_account(tenant_id, &txn).await?;

        let existing = entity::credit_transactions::Entity::find()
            .filter(entity::credit_transactions::Column::TenantId.eq(tenant_id))
            .filter(entity::credit_transactions::Column::PaymentRef.eq(payment_ref))
            .one(&txn)
            .await?;

        if let Some(existing) = existing {
            txn.rollback().await?;
            return Err(ApiError::AlreadyProcessed(format!(
                "Payment {} already credited at {}",
                payment_ref, existing.created_at
            )));
        }

        let description = compose_description(payment_ref, utr_number, claimed_amount);
        let updated = self
            .credits
            .apply_credit_locked(
                account,
                claimed_amount,
                FEATURE_PAYMENT,
                &description,
                Some(payment_ref),
                actor_id,
                &txn,
            )
            .await?;

        txn.commit().await?;

        info!(
            "Credited payment {}: tenant={}, amount={}, balance={}",
            payment_ref, tenant_id, claimed_amount, updated.balance
        );

        Ok(updated)
    }
}

/// Human-readable audit line; the reference is embedded here as well, but
/// the `payment_ref` column is what dedup keys on.
fn compose_description(payment_ref: &str, utr_number: Option<&str>, amount: i64) -> String {
    match utr_number {
        Some(utr) => format!(
            "Payment {} (UTR {}) verified for {} credits",
            payment_ref, utr, amount
        ),
        None => format!("Payment {} verified for {} credits", payment_ref, amount),
    }
}
