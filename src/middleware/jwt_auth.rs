use crate::{
    app_state::AppState,
    error::{ApiError, Result},
    models::common::ActorRole,
    services::jwt_service::JWTService,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Request extension storing verified identity from JWT
#[derive(Debug, Clone)]
pub struct TenantIdentity {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub role: ActorRole,
}

impl TenantIdentity {
    /// Reject non-admin callers on administrative routes
    pub fn require_admin(&self) -> Result<()> {
        if self.role != ActorRole::Admin {
            return Err(ApiError::Forbidden(
                "Administrative role required".to_string(),
            ));
        }
        Ok(())
    }
}

/// JWT authentication middleware
///
/// Extracts the Authorization header, validates the JWT access token,
/// and stores the verified tenant identity in request extensions.
///
/// Returns 401 Unauthorized if the header is missing or token validation fails.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let headers = request.headers();

    // Extract Authorization header
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    // Parse "Bearer <token>" format
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::InvalidToken(
            "Invalid Authorization format, expected 'Bearer <token>'".to_string(),
        )
    })?;

    // Validate JWT token
    let claims = state.jwt_service.validate_token(token)?;

    // Extract identity from claims
    let identity = TenantIdentity {
        tenant_id: JWTService::tenant_id_from_claims(&claims)?,
        actor_id: JWTService::actor_id_from_claims(&claims)?,
        role: JWTService::role_from_claims(&claims)?,
    };

    request.extensions_mut().insert(identity);

    // Continue to next middleware/handler
    Ok(next.run(request).await)
}

/// Axum extractor for tenant identity
///
/// Automatically extracts the verified identity from request extensions.
/// Only works on routes protected by jwt_auth_middleware.
impl<S> FromRequestParts<S> for TenantIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantIdentity>()
            .cloned()
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "Tenant identity not found - route must be protected by jwt_auth_middleware"
                        .to_string(),
                )
            })
    }
}
