use crate::{config::AuthConfig, error::Result, models::common::ActorRole};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (actor user id)
    pub sub: String,
    /// Tenant the actor belongs to
    pub tenant: String,
    /// Actor role within the tenant
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

pub struct JWTService {
    config: Arc<AuthConfig>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JWTService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate a JWT access token for an actor (short-lived)
    pub fn generate_token(&self, actor_id: Uuid, tenant_id: Uuid, role: ActorRole) -> Result<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let exp = now + (self.config.access_token_expiration_minutes as i64 * 60);

        let claims = Claims {
            sub: actor_id.to_string(),
            tenant: tenant_id.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| crate::error::ApiError::Internal(e.into()))?;

        Ok(token)
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    crate::error::ApiError::ExpiredToken
                }
                _ => crate::error::ApiError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Extract actor_id from claims
    pub fn actor_id_from_claims(claims: &Claims) -> Result<Uuid> {
        Uuid::parse_str(&claims.sub)
            .map_err(|e| crate::error::ApiError::InvalidToken(format!("Invalid actor id: {}", e)))
    }

    /// Extract tenant_id from claims
    pub fn tenant_id_from_claims(claims: &Claims) -> Result<Uuid> {
        Uuid::parse_str(&claims.tenant)
            .map_err(|e| crate::error::ApiError::InvalidToken(format!("Invalid tenant id: {}", e)))
    }

    /// Extract actor role from claims
    pub fn role_from_claims(claims: &Claims) -> Result<ActorRole> {
        ActorRole::from_str(&claims.role).ok_or_else(|| {
            crate::error::ApiError::InvalidToken(format!("Invalid actor role: {}", claims.role))
        })
    }
}
