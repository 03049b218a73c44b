use axum::{extract::State, http::StatusCode};
use cricket_server_domain::RecordId;
use log::info;

use crate::{
    ApiResult,
    auth::Auth,
    http::AppState,
    jwt::ActorRole,
    respond, respond_message,
};

#[derive(serde::Serialize, Clone)]
pub struct JsonIdentity {
    id: RecordId,
    role: ActorRole,
}

pub async fn logout(State(state): State<AppState>, Auth(claims): Auth) -> ApiResult<()> {
    state.revoked_tokens.insert(claims.jti, ());
    info!("Revoked token of {} {}", claims.role, claims.sub);
    respond_message(StatusCode::OK, "Logged out")
}

pub async fn me(Auth(claims): Auth) -> ApiResult<JsonIdentity> {
    respond(
        StatusCode::OK,
        "Authenticated",
        JsonIdentity {
            id: claims.sub,
            role: claims.role,
        },
    )
}
