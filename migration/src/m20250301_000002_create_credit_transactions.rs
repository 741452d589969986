use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create credit_transactions table: append-only ledger of
        // balance-changing events, ordered per tenant
        manager
            .create_table(
                Table::create()
                    .table(CreditTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::TenantId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::Kind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::BalanceAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::Feature)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::Description)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditTransactions::PaymentRef).string().null())
                    .col(ColumnDef::new(CreditTransactions::ActorId).uuid().null())
                    .col(ColumnDef::new(CreditTransactions::OrderId).uuid().null())
                    .col(
                        ColumnDef::new(CreditTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Newest-first listing per tenant
        manager
            .create_index(
                Index::create()
                    .name("idx_credit_transactions_tenant_created")
                    .table(CreditTransactions::Table)
                    .col(CreditTransactions::TenantId)
                    .col(CreditTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Idempotency key for payment-sourced credits. NULLs do not collide,
        // so only payment entries participate in the constraint.
        manager
            .create_index(
                Index::create()
                    .name("idx_credit_transactions_tenant_payment_ref")
                    .table(CreditTransactions::Table)
                    .col(CreditTransactions::TenantId)
                    .col(CreditTransactions::PaymentRef)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Ledger amounts are strictly positive; direction lives in `kind`
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE credit_transactions
                    ADD CONSTRAINT chk_credit_transactions_amount_positive
                        CHECK (amount > 0),
                    ADD CONSTRAINT chk_credit_transactions_kind
                        CHECK (kind IN ('credit', 'debit'));
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditTransactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CreditTransactions {
    Table,
    Id,
    TenantId,
    Kind,
    Amount,
    BalanceAfter,
    Feature,
    Description,
    PaymentRef,
    ActorId,
    OrderId,
    CreatedAt,
}
