pub use super::credit_accounts::Entity as CreditAccounts;
pub use super::credit_transactions::Entity as CreditTransactions;
