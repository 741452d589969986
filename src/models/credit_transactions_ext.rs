/// Extension methods for credit_transactions entity
///
/// This file contains custom business logic methods that complement
/// the entity in entity/src/credit_transactions.rs
use crate::models::common::TransactionKind;
use entity::credit_transactions;

/// Extension trait for ledger entry models
pub trait CreditTransactionExt {
    /// Whether this entry increased the balance
    fn is_credit(&self) -> bool;

    /// Amount with direction applied: positive for credits, negative for debits
    fn signed_amount(&self) -> i64;
}

impl CreditTransactionExt for credit_transactions::Model {
    fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Credit.as_str()
    }

    fn signed_amount(&self) -> i64 {
        if self.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }
}
