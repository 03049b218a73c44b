use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use cricket_server_domain::{
    player::{DEFAULT_LOGIN_TYPE, NewPlayer, Player, PlayerFilter, PlayerId, PlayerUpdate},
    player_role::PlayerRoleId,
};
use serde::{Deserialize, Serialize};

use crate::{
    ApiResult, Envelope, JsonBody,
    auth::Auth,
    http::{AppState, IdPath, accept_upload, default_sport_type},
    jwt::{ActorRole, Claims, generate_jwt},
    respond, respond_message,
    upload::log_orphaned_upload,
};

#[derive(Serialize, Clone, Debug)]
pub struct JsonPlayer {
    id: PlayerId,
    name: String,
    email: String,
    phone: Option<String>,
    sport_type: String,
    login_type: String,
    gender: Option<String>,
    date_of_birth: Option<NaiveDate>,
    nationality: Option<String>,
    role_id: Option<PlayerRoleId>,
    batting_style: Option<String>,
    bowling_style: Option<String>,
    dominant_hand: Option<String>,
    profile_image: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<Player> for JsonPlayer {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            email: player.email,
            phone: player.phone,
            sport_type: player.sport_type,
            login_type: player.login_type,
            gender: player.gender,
            date_of_birth: player.date_of_birth,
            nationality: player.nationality,
            role_id: player.role_id,
            batting_style: player.batting_style,
            bowling_style: player.bowling_style,
            dominant_hand: player.dominant_hand,
            profile_image: player.profile_image,
            is_active: player.is_active,
            created_at: player.created_at,
            updated_at: player.updated_at,
            deleted_at: player.deleted_at,
        }
    }
}

fn default_login_type() -> String {
    DEFAULT_LOGIN_TYPE.to_string()
}

#[derive(Deserialize)]
pub struct JsonNewPlayer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    phone: Option<String>,
    #[serde(default)]
    password: String,
    #[serde(default = "default_sport_type")]
    sport_type: String,
    #[serde(default = "default_login_type")]
    login_type: String,
    gender: Option<String>,
    date_of_birth: Option<NaiveDate>,
    nationality: Option<String>,
    role_id: Option<PlayerRoleId>,
    batting_style: Option<String>,
    bowling_style: Option<String>,
    dominant_hand: Option<String>,
}

impl From<JsonNewPlayer> for NewPlayer {
    fn from(json: JsonNewPlayer) -> Self {
        NewPlayer {
            name: json.name,
            email: json.email,
            phone: json.phone,
            password: json.password,
            sport_type: json.sport_type,
            login_type: json.login_type,
            gender: json.gender,
            date_of_birth: json.date_of_birth,
            nationality: json.nationality,
            role_id: json.role_id,
            batting_style: json.batting_style,
            bowling_style: json.bowling_style,
            dominant_hand: json.dominant_hand,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct JsonPlayerUpdate {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    password: Option<String>,
    sport_type: Option<String>,
    gender: Option<String>,
    date_of_birth: Option<NaiveDate>,
    nationality: Option<String>,
    role_id: Option<PlayerRoleId>,
    batting_style: Option<String>,
    bowling_style: Option<String>,
    dominant_hand: Option<String>,
}

impl From<JsonPlayerUpdate> for PlayerUpdate {
    fn from(json: JsonPlayerUpdate) -> Self {
        PlayerUpdate {
            name: json.name,
            email: json.email,
            phone: json.phone,
            password: json.password,
            sport_type: json.sport_type,
            gender: json.gender,
            date_of_birth: json.date_of_birth,
            nationality: json.nationality,
            role_id: json.role_id,
            batting_style: json.batting_style,
            bowling_style: json.bowling_style,
            dominant_hand: json.dominant_hand,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct PlayerQuery {
    sport_type: Option<String>,
    role_id: Option<PlayerRoleId>,
    include_inactive: Option<bool>,
}

#[derive(Deserialize)]
pub struct JsonPlayerLogin {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default = "default_login_type")]
    login_type: String,
    #[serde(default = "default_sport_type")]
    sport_type: String,
}

pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<PlayerQuery>,
) -> ApiResult<Vec<JsonPlayer>> {
    let filter = PlayerFilter {
        sport_type: query.sport_type,
        role_id: query.role_id,
        include_inactive: query.include_inactive.unwrap_or(false),
    };
    let players = state.app.player_service.get_players(filter).await?;
    respond(
        StatusCode::OK,
        "Players fetched successfully",
        players.into_iter().map(JsonPlayer::from).collect(),
    )
}

pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<JsonPlayer> {
    let player = state.app.player_service.get_player(id).await?;
    respond(StatusCode::OK, "Player fetched successfully", player.into())
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<JsonNewPlayer>,
) -> ApiResult<JsonPlayer> {
    let player = state
        .app
        .player_service
        .register_player(payload.into())
        .await?;
    respond(StatusCode::CREATED, "Player created successfully", player.into())
}

pub async fn update(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<JsonPlayerUpdate>,
) -> ApiResult<JsonPlayer> {
    auth.require_account(ActorRole::Player, id)?;
    let player = state
        .app
        .player_service
        .update_player(id, payload.into())
        .await?;
    respond(StatusCode::OK, "Player updated successfully", player.into())
}

pub async fn delete(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    auth.require_account(ActorRole::Player, id)?;
    state.app.player_service.delete_player(id).await?;
    respond_message(StatusCode::OK, "Player deleted successfully")
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<JsonPlayerLogin>,
) -> ApiResult<JsonPlayer> {
    let player = state
        .app
        .player_service
        .try_login(
            &payload.email,
            &payload.password,
            &payload.login_type,
            &payload.sport_type,
        )
        .await?;
    let token = generate_jwt(&Claims::new(player.id, ActorRole::Player))?;
    let body =
        Envelope::with_records("Login successful", JsonPlayer::from(player)).with_token(token);
    Ok((StatusCode::OK, Json(body)))
}

pub async fn upload_profile_image(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
    multipart: Multipart,
) -> ApiResult<JsonPlayer> {
    auth.require_account(ActorRole::Player, id)?;
    state.app.player_service.get_player(id).await?;
    let path = accept_upload(&state, multipart, "profile_image").await?;
    let player = state
        .app
        .player_service
        .set_profile_image(id, path.clone())
        .await
        .inspect_err(|e| log_orphaned_upload(&path, e))?;
    respond(StatusCode::OK, "Profile image uploaded successfully", player.into())
}
