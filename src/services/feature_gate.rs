use crate::{
    error::{ApiError, Result},
    models::common::Feature,
    services::CreditsService,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

/// Check-then-consume gate for paid features.
///
/// Feature endpoints wrap their external operation in `charge`, which runs
/// CHECK -> EXECUTE -> DEDUCT: credits are charged if and only if the
/// operation succeeded. A deduction failure after success is reported in
/// the outcome and logged for out-of-band reconciliation rather than failing
/// the request, since the external side effect cannot be reversed.
pub struct FeatureGate {
    credits: Arc<CreditsService>,
}

/// What happened to the tenant's balance while running an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeStatus {
    Charged { cost: i64, balance: i64 },
    DeductionFailed { cost: i64 },
}

/// Result of a gated operation: the operation's own output plus the charge
#[derive(Debug)]
pub struct ChargeOutcome<T> {
    pub value: T,
    pub status: ChargeStatus,
}

impl FeatureGate {
    pub fn new(credits: Arc<CreditsService>) -> Self {
        Self { credits }
    }

    /// Run `operation` behind a credit charge for `feature`.
    ///
    /// The up-front check is a cheap read that keeps the operation from
    /// running for a tenant that clearly cannot pay; the authoritative
    /// check-and-deduct is the atomic `debit` after the operation succeeds.
    /// Operation errors surface unchanged and charge nothing.
    #[instrument(skip(self, operation))]
    pub async fn charge<T, F, Fut>(
        &self,
        tenant_id: Uuid,
        feature: Feature,
        actor_id: Option<Uuid>,
        order_id: Option<Uuid>,
        operation: F,
    ) -> Result<ChargeOutcome<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cost = feature.cost();

        let account = self.credits.get_account(tenant_id).await?;
        if account.balance < cost {
            return Err(ApiError::InsufficientCredits(format!(
                "{} requires {} credits but tenant {} has {}",
                feature, cost, tenant_id, account.balance
            )));
        }

        let value = operation().await?;

        let description = format!("Consumed {} credits for {}", cost, feature);
        match self
            .credits
            .debit(
                tenant_id,
                cost,
                feature.as_str(),
                &description,
                actor_id,
                order_id,
            )
            .await
        {
            Ok(account) => Ok(ChargeOutcome {
                value,
                status: ChargeStatus::Charged {
                    cost,
                    balance: account.balance,
                },
            }),
            Err(e) => {
                // The operation already succeeded and cannot be reversed;
                // return its result and leave the missing charge to
                // reconciliation.
                error!(
                    tenant_id = %tenant_id,
                    feature = %feature,
                    cost,
                    error = %e,
                    "Deduction failed after successful operation; account requires reconciliation"
                );
                Ok(ChargeOutcome {
                    value,
                    status: ChargeStatus::DeductionFailed { cost },
                })
            }
        }
    }
}
