use crate::{
    config::Config,
    services::{CreditsService, FeatureGate, JWTService, PaymentService},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_service: Arc<JWTService>,
    pub credits_service: Arc<CreditsService>,
    pub payment_service: Arc<PaymentService>,
    pub feature_gate: Arc<FeatureGate>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        // Connect to database
        let db = sea_orm::Database::connect(&config.database.url).await?;

        // Initialize services
        let jwt_service = Arc::new(JWTService::new(Arc::new(config.auth.clone())));
        let credits_service = Arc::new(CreditsService::new(db.clone()));
        let payment_service = Arc::new(PaymentService::new(db.clone(), credits_service.clone()));
        let feature_gate = Arc::new(FeatureGate::new(credits_service.clone()));

        Ok(Self {
            db,
            jwt_service,
            credits_service,
            payment_service,
            feature_gate,
            config: Arc::new(config),
        })
    }
}
