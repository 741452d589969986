use crate::{
    error::{ApiError, Result},
    models::common::TransactionKind,
};
use sea_orm::{
    entity::*, query::*, sea_query::OnConflict, DatabaseConnection, DatabaseTransaction, DbErr,
    PaginatorTrait, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

/// Per-tenant credit account store.
///
/// The account row is the only shared mutable resource: every mutation locks
/// it exclusively for the duration of one transaction, appends the matching
/// ledger entry inside that same transaction, and commits both or neither.
/// Reads never take the tenant lock.
pub struct CreditsService {
    db: DatabaseConnection,
}

impl CreditsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get the current account for a tenant.
    ///
    /// Returns a zero-initialized view if the tenant has no row yet; the row
    /// itself is materialized by the first mutation. Display path only:
    /// gating decisions go through `debit`.
    #[instrument(skip(self))]
    pub async fn get_account(&self, tenant_id: Uuid) -> Result<entity::credit_accounts::Model> {
        let account = entity::credit_accounts::Entity::find()
            .filter(entity::credit_accounts::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?;

        Ok(account.unwrap_or_else(|| Self::zero_account(tenant_id)))
    }

    /// Check whether a tenant can afford `amount` credits.
    ///
    /// Convenience read for early-exit messages; never sufficient on its own
    /// to gate a deduction, which must go through the atomic `debit`.
    #[instrument(skip(self))]
    pub async fn has_sufficient_credits(&self, tenant_id: Uuid, amount: i64) -> Result<bool> {
        let account = self.get_account(tenant_id).await?;
        Ok(account.balance >= amount)
    }

    /// Add credits to a tenant's account and append the matching ledger entry.
    #[instrument(skip(self, description))]
    pub async fn credit(
        &self,
        tenant_id: Uuid,
        amount: i64,
        feature: &str,
        description: &str,
        actor_id: Option<Uuid>,
    ) -> Result<entity::credit_accounts::Model> {
        if amount <= 0 {
            return Err(ApiError::BadRequest(
                "Credit amount must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let account = self.find_and_lock_account(tenant_id, &txn).await?;
        let updated = self
            .apply_credit_locked(account, amount, feature, description, None, actor_id, &txn)
            .await?;

        txn.commit().await?;

        info!(
            "Credited {} credits to tenant {} (balance: {})",
            amount, tenant_id, updated.balance
        );

        Ok(updated)
    }

    /// Deduct credits from a tenant's account.
    ///
    /// The balance check and the deduction run under the same exclusive row
    /// lock; a tenant that cannot afford `amount` is rejected with
    /// `InsufficientCredits` and nothing changes.
    #[instrument(skip(self, description))]
    pub async fn debit(
        &self,
        tenant_id: Uuid,
        amount: i64,
        feature: &str,
        description: &str,
        actor_id: Option<Uuid>,
        order_id: Option<Uuid>,
    ) -> Result<entity::credit_accounts::Model> {
        if amount <= 0 {
            return Err(ApiError::BadRequest(
                "Debit amount must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let account = self.find_and_lock_account(tenant_id, &txn).await?;

        if account.balance < amount {
            txn.rollback().await?;
            return Err(ApiError::InsufficientCredits(format!(
                "Tenant {} needs {} credits but has {}",
                tenant_id, amount, account.balance
            )));
        }

        let now = time::OffsetDateTime::now_utc();
        let new_balance = account.balance - amount;
        let new_total_used = account.total_used + amount;

        let mut account_active: entity::credit_accounts::ActiveModel = account.into();
        account_active.balance = Set(new_balance);
        account_active.total_used = Set(new_total_used);
        account_active.updated_at = Set(now);
        let updated = account_active.update(&txn).await?;

        self.append_entry(
            tenant_id,
            TransactionKind::Debit,
            amount,
            new_balance,
            feature,
            description,
            None,
            actor_id,
            order_id,
            &txn,
        )
        .await?;

        txn.commit().await?;

        info!(
            "Debited {} credits from tenant {} for {} (balance: {})",
            amount, tenant_id, feature, new_balance
        );

        Ok(updated)
    }

    /// Administrative override: set the balance to an exact value.
    ///
    /// The ledger records the signed delta as a credit or debit of that
    /// magnitude, and the lifetime totals absorb it in the corresponding
    /// direction, so the running-balance and totals invariants keep holding.
    /// A reset to the current balance appends nothing.
    #[instrument(skip(self, description))]
    pub async fn reset(
        &self,
        tenant_id: Uuid,
        new_balance: i64,
        description: &str,
        actor_id: Uuid,
    ) -> Result<entity::credit_accounts::Model> {
        if new_balance < 0 {
            return Err(ApiError::BadRequest(
                "Balance cannot be set to a negative value".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let account = self.find_and_lock_account(tenant_id, &txn).await?;

        let delta = new_balance - account.balance;
        if delta == 0 {
            txn.rollback().await?;
            return Ok(account);
        }

        let (kind, magnitude) = if delta > 0 {
            (TransactionKind::Credit, delta)
        } else {
            (TransactionKind::Debit, -delta)
        };

        let now = time::OffsetDateTime::now_utc();
        let new_total_added = account.total_added + delta.max(0);
        let new_total_used = account.total_used + (-delta).max(0);

        let mut account_active: entity::credit_accounts::ActiveModel = account.into();
        account_active.balance = Set(new_balance);
        account_active.total_added = Set(new_total_added);
        account_active.total_used = Set(new_total_used);
        account_active.updated_at = Set(now);
        let updated = account_active.update(&txn).await?;

        self.append_entry(
            tenant_id,
            kind,
            magnitude,
            new_balance,
            crate::models::common::FEATURE_MANUAL,
            description,
            None,
            Some(actor_id),
            None,
            &txn,
        )
        .await?;

        txn.commit().await?;

        info!(
            "Reset tenant {} balance to {} ({} of {})",
            tenant_id, new_balance, kind, magnitude
        );

        Ok(updated)
    }

    /// Page through a tenant's ledger, newest first.
    /// Returns (entries, total_items, total_pages); `page` is 1-based.
    #[instrument(skip(self))]
    pub async fn list_transactions(
        &self,
        tenant_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<entity::credit_transactions::Model>, u64, u64)> {
        let paginator = entity::credit_transactions::Entity::find()
            .filter(entity::credit_transactions::Column::TenantId.eq(tenant_id))
            .order_by_desc(entity::credit_transactions::Column::CreatedAt)
            .order_by_desc(entity::credit_transactions::Column::Id)
            .paginate(&self.db, limit.max(1));

        let totals = paginator.num_items_and_pages().await?;
        let entries = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((entries, totals.number_of_items, totals.number_of_pages))
    }

    /// Full ledger for a tenant, oldest first. Replaying the signed amounts
    /// in this order reproduces the current balance.
    #[instrument(skip(self))]
    pub async fn get_ledger(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<entity::credit_transactions::Model>> {
        let entries = entity::credit_transactions::Entity::find()
            .filter(entity::credit_transactions::Column::TenantId.eq(tenant_id))
            .order_by_asc(entity::credit_transactions::Column::CreatedAt)
            .order_by_asc(entity::credit_transactions::Column::Id)
            .all(&self.db)
            .await?;

        Ok(entries)
    }

    /// Find the tenant's account row and lock it exclusively, creating the
    /// zero-initialized row first if this is the tenant's first mutation.
    pub(crate) async fn find_and_lock_account(
        &self,
        tenant_id: Uuid,
        txn: &DatabaseTransaction,
    ) -> Result<entity::credit_accounts::Model> {
        // Try to find with lock
        let account = entity::credit_accounts::Entity::find()
            .filter(entity::credit_accounts::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(txn)
            .await?;

        if let Some(account) = account {
            return Ok(account);
        }

        // If not found, insert (no-op if another transaction races) then re-lock
        let now = time::OffsetDateTime::now_utc();
        let new_account = entity::credit_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            balance: Set(0),
            total_added: Set(0),
            total_used: Set(0),
            updated_at: Set(now),
            created_at: Set(now),
        };

        let insert_result = entity::credit_accounts::Entity::insert(new_account)
            .on_conflict(
                OnConflict::column(entity::credit_accounts::Column::TenantId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(txn)
            .await;

        match insert_result {
            Ok(_) => {}
            // Another transaction created the row; the locked read below wins it
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        entity::credit_accounts::Entity::find()
            .filter(entity::credit_accounts::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| {
                ApiError::Internal(anyhow::anyhow!(
                    "Failed to create or lock credit account for tenant {}",
                    tenant_id
                ))
            })
    }

    /// Apply a credit to an already-locked account row and append the ledger
    /// entry in the same transaction. The caller owns commit/rollback.
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn apply_credit_locked(
        &self,
        account: entity::credit_accounts::Model,
        amount: i64,
        feature: &str,
        description: &str,
        payment_ref: Option<&str>,
        actor_id: Option<Uuid>,
        txn: &DatabaseTransaction,
    ) -> Result<entity::credit_accounts::Model> {
        let now = time::OffsetDateTime::now_utc();
        let tenant_id = account.tenant_id;
        let new_balance = account.balance + amount;
        let new_total_added = account.total_added + amount;

        let mut account_active: entity::credit_accounts::ActiveModel = account.into();
        account_active.balance = Set(new_balance);
        account_active.total_added = Set(new_total_added);
        account_active.updated_at = Set(now);
        let updated = account_active.update(txn).await?;

        self.append_entry(
            tenant_id,
            TransactionKind::Credit,
            amount,
            new_balance,
            feature,
            description,
            payment_ref,
            actor_id,
            None,
            txn,
        )
        .await?;

        Ok(updated)
    }

    /// Append one immutable ledger entry. Always called inside the transaction
    /// that performed the balance mutation it records.
    #[allow(clippy::too_many_arguments)]
    async fn append_entry(
        &self,
        tenant_id: Uuid,
        kind: TransactionKind,
        amount: i64,
        balance_after: i64,
        feature: &str,
        description: &str,
        payment_ref: Option<&str>,
        actor_id: Option<Uuid>,
        order_id: Option<Uuid>,
        txn: &DatabaseTransaction,
    ) -> Result<()> {
        let entry = entity::credit_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            kind: Set(kind.as_str().to_string()),
            amount: Set(amount),
            balance_after: Set(balance_after),
            feature: Set(feature.to_string()),
            description: Set(description.to_string()),
            payment_ref: Set(payment_ref.map(|s| s.to_string())),
            actor_id: Set(actor_id),
            order_id: Set(order_id),
            created_at: Set(time::OffsetDateTime::now_utc()),
        };

        entity::credit_transactions::Entity::insert(entry)
            .exec(txn)
            .await?;

        Ok(())
    }

    fn zero_account(tenant_id: Uuid) -> entity::credit_accounts::Model {
        let now = time::OffsetDateTime::now_utc();
        entity::credit_accounts::Model {
            id: Uuid::new_v4(),
            tenant_id,
            balance: 0,
            total_added: 0,
            total_used: 0,
            updated_at: now,
            created_at: now,
        }
    }
}
