use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use cricket_server_domain::{
    ServiceError, ServiceResult,
    club::ClubId,
    coach::CoachId,
    team::{NewTeam, Team, TeamFilter, TeamId, TeamUpdate},
};
use serde::{Deserialize, Serialize};

use crate::{
    ApiResult, JsonBody,
    auth::Auth,
    http::{AppState, IdPath, accept_upload, default_sport_type},
    jwt::ActorRole,
    respond, respond_message,
    upload::log_orphaned_upload,
};

#[derive(Serialize, Clone, Debug)]
pub struct JsonTeam {
    id: TeamId,
    name: String,
    sport_type: String,
    club_id: Option<ClubId>,
    coach_id: Option<CoachId>,
    level: Option<String>,
    city: Option<String>,
    country: Option<String>,
    founded_year: Option<i32>,
    description: Option<String>,
    logo: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<Team> for JsonTeam {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            sport_type: team.sport_type,
            club_id: team.club_id,
            coach_id: team.coach_id,
            level: team.level,
            city: team.city,
            country: team.country,
            founded_year: team.founded_year,
            description: team.description,
            logo: team.logo,
            is_active: team.is_active,
            created_at: team.created_at,
            updated_at: team.updated_at,
            deleted_at: team.deleted_at,
        }
    }
}

#[derive(Deserialize)]
pub struct JsonNewTeam {
    #[serde(default)]
    name: String,
    #[serde(default = "default_sport_type")]
    sport_type: String,
    club_id: Option<ClubId>,
    coach_id: Option<CoachId>,
    level: Option<String>,
    city: Option<String>,
    country: Option<String>,
    founded_year: Option<i32>,
    description: Option<String>,
}

impl From<JsonNewTeam> for NewTeam {
    fn from(json: JsonNewTeam) -> Self {
        NewTeam {
            name: json.name,
            sport_type: json.sport_type,
            club_id: json.club_id,
            coach_id: json.coach_id,
            level: json.level,
            city: json.city,
            country: json.country,
            founded_year: json.founded_year,
            description: json.description,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct JsonTeamUpdate {
    name: Option<String>,
    sport_type: Option<String>,
    club_id: Option<ClubId>,
    coach_id: Option<CoachId>,
    level: Option<String>,
    city: Option<String>,
    country: Option<String>,
    founded_year: Option<i32>,
    description: Option<String>,
}

impl From<JsonTeamUpdate> for TeamUpdate {
    fn from(json: JsonTeamUpdate) -> Self {
        TeamUpdate {
            name: json.name,
            sport_type: json.sport_type,
            club_id: json.club_id,
            coach_id: json.coach_id,
            level: json.level,
            city: json.city,
            country: json.country,
            founded_year: json.founded_year,
            description: json.description,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct TeamQuery {
    sport_type: Option<String>,
    club_id: Option<ClubId>,
    coach_id: Option<CoachId>,
    include_inactive: Option<bool>,
}

/// Super admins manage every team, clubs and coaches only the ones they are linked to.
fn require_team_manager(auth: &Auth, team: &Team) -> ServiceResult<()> {
    let Auth(claims) = auth;
    let linked = match claims.role {
        ActorRole::SuperAdmin => true,
        ActorRole::Club => team.club_id == Some(claims.sub),
        ActorRole::Coach => team.coach_id == Some(claims.sub),
        ActorRole::Player => false,
    };
    if !linked {
        return ServiceError::forbidden("Not allowed to modify this team");
    }
    Ok(())
}

pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> ApiResult<Vec<JsonTeam>> {
    let filter = TeamFilter {
        sport_type: query.sport_type,
        club_id: query.club_id,
        coach_id: query.coach_id,
        include_inactive: query.include_inactive.unwrap_or(false),
    };
    let teams = state.app.team_service.get_teams(filter).await?;
    respond(
        StatusCode::OK,
        "Teams fetched successfully",
        teams.into_iter().map(JsonTeam::from).collect(),
    )
}

pub async fn get_by_id(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<JsonTeam> {
    let team = state.app.team_service.get_team(id).await?;
    respond(StatusCode::OK, "Team fetched successfully", team.into())
}

pub async fn create(
    State(state): State<AppState>,
    _auth: Auth,
    JsonBody(payload): JsonBody<JsonNewTeam>,
) -> ApiResult<JsonTeam> {
    let team = state.app.team_service.create_team(payload.into()).await?;
    respond(StatusCode::CREATED, "Team created successfully", team.into())
}

pub async fn update(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<JsonTeamUpdate>,
) -> ApiResult<JsonTeam> {
    require_team_manager(&auth, &state.app.team_service.get_team(id).await?)?;
    let team = state
        .app
        .team_service
        .update_team(id, payload.into())
        .await?;
    respond(StatusCode::OK, "Team updated successfully", team.into())
}

pub async fn delete(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    require_team_manager(&auth, &state.app.team_service.get_team(id).await?)?;
    state.app.team_service.delete_team(id).await?;
    respond_message(StatusCode::OK, "Team deleted successfully")
}

pub async fn upload_logo(
    State(state): State<AppState>,
    auth: Auth,
    IdPath(id): IdPath,
    multipart: Multipart,
) -> ApiResult<JsonTeam> {
    require_team_manager(&auth, &state.app.team_service.get_team(id).await?)?;
    let path = accept_upload(&state, multipart, "team_logo").await?;
    let team = state
        .app
        .team_service
        .set_logo(id, path.clone())
        .await
        .inspect_err(|e| log_orphaned_upload(&path, e))?;
    respond(StatusCode::OK, "Team logo uploaded successfully", team.into())
}

#[cfg(test)]
mod tests {
    use cricket_server_domain::club::NewClub;
    use serde_json::json;

    use crate::{
        http::{into_json, test_state},
        jwt::{ActorRole, Claims},
    };

    use super::*;

    fn auth() -> Auth {
        Auth(Claims::new(1, ActorRole::Club))
    }

    fn new_team(value: serde_json::Value) -> JsonBody<JsonNewTeam> {
        JsonBody(serde_json::from_value(value).unwrap())
    }

    async fn add_club(state: &AppState) -> ClubId {
        state
            .app
            .club_service
            .register_club(NewClub {
                name: "Club".into(),
                email: "club@x.com".into(),
                password: "secret1".into(),
                phone: None,
                address: None,
                city: None,
                country: None,
                sport_type: "cricket".into(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_unknown_club_is_rejected() {
        let state = test_state();
        let (status, body) = into_json(
            create(
                State(state.clone()),
                auth(),
                new_team(json!({"name": "Colts", "club_id": 12})),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], true);

        let (_, body) =
            into_json(get_all(State(state), Query(TeamQuery::default())).await).await;
        assert!(body["records"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_update_and_filter_by_club() {
        let state = test_state();
        let club_id = add_club(&state).await;

        let (status, body) = into_json(
            create(
                State(state.clone()),
                auth(),
                new_team(json!({"name": "Colts", "club_id": club_id, "founded_year": 1990})),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let team_id = body["records"]["id"].as_i64().unwrap();
        create(State(state.clone()), auth(), new_team(json!({"name": "Strays"})))
            .await
            .unwrap();

        let update_payload = JsonTeamUpdate {
            level: Some("Senior".into()),
            ..Default::default()
        };
        let (_, body) = into_json(
            update(State(state.clone()), auth(), IdPath(team_id), JsonBody(update_payload)).await,
        )
        .await;
        assert_eq!(body["records"]["level"], "Senior");
        assert_eq!(body["records"]["founded_year"], 1990);
        assert_eq!(body["records"]["club_id"], club_id);

        let query = TeamQuery {
            club_id: Some(club_id),
            ..Default::default()
        };
        let (_, body) = into_json(get_all(State(state), Query(query)).await).await;
        let records = body["records"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Colts");
    }

    #[tokio::test]
    async fn test_only_linked_actors_modify_a_team() {
        let state = test_state();
        let club_id = add_club(&state).await;
        create(
            State(state.clone()),
            auth(),
            new_team(json!({"name": "Colts", "club_id": club_id, "coach_id": null})),
        )
        .await
        .unwrap();

        for outsider in [
            Auth(Claims::new(club_id + 1, ActorRole::Club)),
            Auth(Claims::new(club_id, ActorRole::Coach)),
            Auth(Claims::new(club_id, ActorRole::Player)),
        ] {
            let (status, _) =
                into_json(delete(State(state.clone()), outsider, IdPath(1)).await).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
        }

        let admin = Auth(Claims::new(5, ActorRole::SuperAdmin));
        let (status, _) = into_json(delete(State(state), admin, IdPath(1)).await).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_missing_team() {
        let (status, _) = into_json(delete(State(test_state()), auth(), IdPath(7)).await).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
