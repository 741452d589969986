use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create credit_accounts table: one row per tenant, current balance
        // plus lifetime totals
        manager
            .create_table(
                Table::create()
                    .table(CreditAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditAccounts::TenantId).uuid().not_null())
                    .col(
                        ColumnDef::new(CreditAccounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::TotalAdded)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::TotalUsed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One account per tenant
        manager
            .create_index(
                Index::create()
                    .name("idx_credit_accounts_tenant_id")
                    .table(CreditAccounts::Table)
                    .col(CreditAccounts::TenantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Balance never negative, totals reconcile with balance
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE credit_accounts
                    ADD CONSTRAINT chk_credit_accounts_balance_non_negative
                        CHECK (balance >= 0),
                    ADD CONSTRAINT chk_credit_accounts_totals_consistent
                        CHECK (balance = total_added - total_used);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditAccounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CreditAccounts {
    Table,
    Id,
    TenantId,
    Balance,
    TotalAdded,
    TotalUsed,
    UpdatedAt,
    CreatedAt,
}
