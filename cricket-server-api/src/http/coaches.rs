use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use cricket_server_domain::coach::{Coach, CoachFilter, CoachId, CoachUpdate, NewCoach};
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
pub struct JsonCoach {
    id: CoachId,
    name: String,
    email: String,
    phone: Option<String>,
    speciality: Option<String>,
    experience_years: Option<i32>,
    sport_type: String,
    profile_image: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<Coach> for JsonCoach {
    fn from(coach: Coach) -> Self {
        Self {
            id: coach.id,
            name: coach.name,
            email: coach.email,
            phone: coach.phone,
            speciality: coach.speciality,
            experience_years: coach.experience_years,
            sport_type: coach.sport_type,
            profile_image: coach.profile_image,
            is_active: coach.is_active,
            created_at: coach.created_at,
            updated_at: coach.updated_at,
            deleted_at: coach.deleted_at,
        }
    }
}

#[derive(Deserialize)]
pub struct JsonNewCoach {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    phone: Option<String>,
    speciality: Option<String>,
    experience_years: Option<i32>,
    #[serde(default = "default_sport_type")]
    sport_type: String,
}

impl From<JsonNewCoach> for NewCoach {
    fn from(json: JsonNewCoach) -> Self {
        NewCoach {
            name: json.name,
            email: json.email,
            password: json.password,
            phone: json.phone,
            speciality: json.speciality,
            experience_years: json.experience_years,
            sport_type: json.sport_type,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct JsonCoachUpdate {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone: Option<String>,
    speciality: Option<String>,
    experience_years: Option<i32>,
    sport_type: Option<String>,
}

impl From<JsonCoachUpdate> for CoachUpdate {
    fn from(json: JsonCoachUpdate) -> Self {
        CoachUpdate {
            name: json.name,
            email: json.email,
            password: json.password,
            phone: json.phone,
            speciality: json.speciality,
            experience_years: json.experience_years,
            sport_type: json.sport_type,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct CoachQuery {
    sport_type: Option<String>,
    include_inactive: Option<bool>,
}

pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<CoachQuery>,
) -> ApiResult<Vec<JsonCoach>> {
    let filter = CoachFilter {
        sport_type: query.sport_type,
        include_inactive: query.include_inactive.unwrap_or(false),
    };
    let coaches = state.app.coach_service.get_coaches(filter).await?;
    respond(
        StatusCode::OK,
        "Coaches fetched successfully",
        coaches.into_iter().map(JsonCoach::from).collect(),
    )
}

pub async fn get_by_id(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<JsonCoach> {
    let coach = state.app.coach_service.get_coach(id).await?;
    respond(StatusCode::OK, "Coach fetched successfully", coach.into())
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<JsonNewCoach>,
) -> ApiResult<JsonCoach> {
    let coach = state.app.coach_service.register_coach(payload.into()).await?;
    respond(StatusCode::CREATED, "Coach created successfully", coach.into())
}

pub async fn update(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<JsonCoachUpdate>,
) -> ApiResult<JsonCoach> {
    auth.require_account(ActorRole::Coach, id)?;
    let coach = state
        .app
        .coach_service
        .update_coach(id, payload.into())
        .await?;
    respond(StatusCode::OK, "Coach updated successfully", coach.into())
}

pub async fn delete(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    auth.require_account(ActorRole::Coach, id)?;
    state.app.coach_service.delete_coach(id).await?;
    respond_message(StatusCode::OK, "Coach deleted successfully")
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<JsonLogin>,
) -> ApiResult<JsonCoach> {
    let coach = state
        .app
        .coach_service
        .try_login(&payload.email, &payload.password)
        .await?;
    let token = generate_jwt(&Claims::new(coach.id, ActorRole::Coach))?;
    let body = Envelope::with_records("Login successful", JsonCoach::from(coach)).with_token(token);
    Ok((StatusCode::OK, Json(body)))
}

pub async fn upload_profile_image(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
    multipart: Multipart,
) -> ApiResult<JsonCoach> {
    auth.require_account(ActorRole::Coach, id)?;
    state.app.coach_service.get_coach(id).await?;
    let path = accept_upload(&state, multipart, "profile_image").await?;
    let coach = state
        .app
        .coach_service
        .set_profile_image(id, path.clone())
        .await
        .inspect_err(|e| log_orphaned_upload(&path, e))?;
    respond(StatusCode::OK, "Profile image uploaded successfully", coach.into())
}
