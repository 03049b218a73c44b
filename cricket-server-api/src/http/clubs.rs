use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use cricket_server_domain::club::{Club, ClubFilter, ClubId, ClubUpdate, NewClub};
use serde::{Deserialize, Serialize};

use crate::{
    ApiResult, Envelope, JsonBody,
    auth::Auth,
    http::{AppState, IdPath, JsonLogin, accept_upload, default_sport_type},
    jwt::{ActorRole, Claims, generate_jwt},
    respond, respond_message,
    upload::log_orphaned_upload,
};

#[derive(Serialize, Clone, Debug)]
pub struct JsonClub {
    id: ClubId,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    sport_type: String,
    logo: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<Club> for JsonClub {
    fn from(club: Club) -> Self {
        Self {
            id: club.id,
            name: club.name,
            email: club.email,
            phone: club.phone,
            address: club.address,
            city: club.city,
            country: club.country,
            sport_type: club.sport_type,
            logo: club.logo,
            is_active: club.is_active,
            created_at: club.created_at,
            updated_at: club.updated_at,
            deleted_at: club.deleted_at,
        }
    }
}

#[derive(Deserialize)]
pub struct JsonNewClub {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    #[serde(default = "default_sport_type")]
    sport_type: String,
}

impl From<JsonNewClub> for NewClub {
    fn from(json: JsonNewClub) -> Self {
        NewClub {
            name: json.name,
            email: json.email,
            password: json.password,
            phone: json.phone,
            address: json.address,
            city: json.city,
            country: json.country,
            sport_type: json.sport_type,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct JsonClubUpdate {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    sport_type: Option<String>,
}

impl From<JsonClubUpdate> for ClubUpdate {
    fn from(json: JsonClubUpdate) -> Self {
        ClubUpdate {
            name: json.name,
            email: json.email,
            password: json.password,
            phone: json.phone,
            address: json.address,
            city: json.city,
            country: json.country,
            sport_type: json.sport_type,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct ClubQuery {
    sport_type: Option<String>,
    city: Option<String>,
    include_inactive: Option<bool>,
}

pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<ClubQuery>,
) -> ApiResult<Vec<JsonClub>> {
    let filter = ClubFilter {
        sport_type: query.sport_type,
        city: query.city,
        include_inactive: query.include_inactive.unwrap_or(false),
    };
    let clubs = state.app.club_service.get_clubs(filter).await?;
    respond(
        StatusCode::OK,
        "Clubs fetched successfully",
        clubs.into_iter().map(JsonClub::from).collect(),
    )
}

pub async fn get_by_id(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<JsonClub> {
    let club = state.app.club_service.get_club(id).await?;
    respond(StatusCode::OK, "Club fetched successfully", club.into())
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<JsonNewClub>,
) -> ApiResult<JsonClub> {
    let club = state.app.club_service.register_club(payload.into()).await?;
    respond(StatusCode::CREATED, "Club created successfully", club.into())
}

pub async fn update(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<JsonClubUpdate>,
) -> ApiResult<JsonClub> {
    auth.require_account(ActorRole::Club, id)?;
    let club = state
        .app
        .club_service
        .update_club(id, payload.into())
        .await?;
    respond(StatusCode::OK, "Club updated successfully", club.into())
}

pub async fn delete(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    auth.require_account(ActorRole::Club, id)?;
    state.app.club_service.delete_club(id).await?;
    respond_message(StatusCode::OK, "Club deleted successfully")
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<JsonLogin>,
) -> ApiResult<JsonClub> {
    let club = state
        .app
        .club_service
        .try_login(&payload.email, &payload.password)
        .await?;
    let token = generate_jwt(&Claims::new(club.id, ActorRole::Club))?;
    let body = Envelope::with_records("Login successful", JsonClub::from(club)).with_token(token);
    Ok((StatusCode::OK, Json(body)))
}

pub async fn upload_logo(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
    multipart: Multipart,
) -> ApiResult<JsonClub> {
    auth.require_account(ActorRole::Club, id)?;
    state.app.club_service.get_club(id).await?;
    let path = accept_upload(&state, multipart, "logo").await?;
    let club = state
        .app
        .club_service
        .set_logo(id, path.clone())
        .await
        .inspect_err(|e| log_orphaned_upload(&path, e))?;
    respond(StatusCode::OK, "Logo uploaded successfully", club.into())
}
