use std::time::Duration;

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use cricket_server_domain::{RecordId, ServiceError, ServiceResult};
use moka::sync::Cache;

use crate::{
    ApiError,
    http::AppState,
    jwt::{ActorRole, Claims, TOKEN_LIFETIME_HOURS, validate_jwt},
};

/// Token ids that were logged out before expiring.
pub type RevokedTokens = Cache<String, ()>;

pub fn revoked_tokens() -> RevokedTokens {
    Cache::builder()
        .time_to_live(Duration::from_secs(TOKEN_LIFETIME_HOURS as u64 * 60 * 60))
        .build()
}

pub struct Auth(pub Claims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                ApiError(ServiceError::Unauthorized(
                    "Missing or malformed bearer token".to_string(),
                ))
            })?;

        let claims = validate_jwt(bearer.token())?;
        if state.revoked_tokens.contains_key(&claims.jti) {
            return Err(ApiError(ServiceError::Unauthorized(
                "Token has been revoked".to_string(),
            )));
        }
        Ok(Auth(claims))
    }
}

impl Auth {
    /// Lets through super admins and the account the token was minted for.
    pub fn require_account(&self, role: ActorRole, id: RecordId) -> ServiceResult<()> {
        let Auth(claims) = self;
        if claims.role == ActorRole::SuperAdmin || (claims.role == role && claims.sub == id) {
            return Ok(());
        }
        ServiceError::forbidden("Not allowed to modify this account")
    }
}

/// A valid token minted for a super admin.
pub struct SuperAdminAuth(pub Claims);

impl FromRequestParts<AppState> for SuperAdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(claims) = Auth::from_request_parts(parts, state).await?;
        if claims.role != ActorRole::SuperAdmin {
            return Err(ApiError(ServiceError::Forbidden(
                "Super admin access required".to_string(),
            )));
        }
        Ok(SuperAdminAuth(claims))
    }
}
