// Service modules
pub mod credits_service;
pub mod feature_gate;
pub mod jwt_service;
pub mod payment_service;

pub use credits_service::CreditsService;
pub use feature_gate::{ChargeOutcome, ChargeStatus, FeatureGate};
pub use jwt_service::JWTService;
pub use payment_service::PaymentService;
