use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use cricket_server_domain::player_role::{
    NewPlayerRole, PlayerRole, PlayerRoleId, PlayerRoleUpdate,
};
use serde::{Deserialize, Serialize};

use crate::{
    ApiResult, JsonBody,
    auth::SuperAdminAuth,
    http::{AppState, IdPath, default_sport_type},
    respond, respond_message,
};

#[derive(Serialize, Clone, Debug)]
pub struct JsonPlayerRole {
    id: PlayerRoleId,
    name: String,
    sport_type: String,
}

impl From<PlayerRole> for JsonPlayerRole {
    fn from(role: PlayerRole) -> Self {
        Self {
            id: role.id,
            name: role.name,
            sport_type: role.sport_type,
        }
    }
}

#[derive(Deserialize)]
pub struct JsonNewPlayerRole {
    #[serde(default)]
    name: String,
    #[serde(default = "default_sport_type")]
    sport_type: String,
}

#[derive(Deserialize, Default)]
pub struct JsonPlayerRoleUpdate {
    name: Option<String>,
    sport_type: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct PlayerRoleQuery {
    sport_type: Option<String>,
}

pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<PlayerRoleQuery>,
) -> ApiResult<Vec<JsonPlayerRole>> {
    let roles = state
        .app
        .player_role_service
        .get_roles(query.sport_type)
        .await?;
    respond(
        StatusCode::OK,
        "Player roles fetched successfully",
        roles.into_iter().map(JsonPlayerRole::from).collect(),
    )
}

pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<JsonPlayerRole> {
    let role = state.app.player_role_service.get_role(id).await?;
    respond(StatusCode::OK, "Player role fetched successfully", role.into())
}

pub async fn create(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    JsonBody(payload): JsonBody<JsonNewPlayerRole>,
) -> ApiResult<JsonPlayerRole> {
    let role = state
        .app
        .player_role_service
        .create_role(NewPlayerRole {
            name: payload.name,
            sport_type: payload.sport_type,
        })
        .await?;
    respond(StatusCode::CREATED, "Player role created successfully", role.into())
}

pub async fn update(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<JsonPlayerRoleUpdate>,
) -> ApiResult<JsonPlayerRole> {
    let update = PlayerRoleUpdate {
        name: payload.name,
        sport_type: payload.sport_type,
    };
    let role = state.app.player_role_service.update_role(id, update).await?;
    respond(StatusCode::OK, "Player role updated successfully", role.into())
}

pub async fn delete(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    state.app.player_role_service.delete_role(id).await?;
    respond_message(StatusCode::OK, "Player role deleted successfully")
}
