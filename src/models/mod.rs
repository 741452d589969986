// Request/Response models
pub mod common;
pub mod credit_transactions_ext; // Extension methods for entity::credit_transactions
pub mod credits;
