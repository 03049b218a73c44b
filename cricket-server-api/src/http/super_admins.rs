use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use cricket_server_domain::super_admin::{
    NewSuperAdmin, SuperAdmin, SuperAdminFilter, SuperAdminId, SuperAdminUpdate,
};
use serde::{Deserialize, Serialize};

use crate::{
    ApiResult, Envelope, JsonBody,
    auth::SuperAdminAuth,
    http::{AppState, IdPath, JsonLogin, accept_upload},
    jwt::{ActorRole, Claims, generate_jwt},
    respond, respond_message,
    upload::log_orphaned_upload,
};

#[derive(Serialize, Clone, Debug)]
pub struct JsonSuperAdmin {
    id: SuperAdminId,
    name: String,
    email: String,
    phone: Option<String>,
    profile_image: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<SuperAdmin> for JsonSuperAdmin {
    fn from(admin: SuperAdmin) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            phone: admin.phone,
            profile_image: admin.profile_image,
            is_active: admin.is_active,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
            deleted_at: admin.deleted_at,
        }
    }
}

#[derive(Deserialize)]
pub struct JsonNewSuperAdmin {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    phone: Option<String>,
}

impl From<JsonNewSuperAdmin> for NewSuperAdmin {
    fn from(json: JsonNewSuperAdmin) -> Self {
        NewSuperAdmin {
            name: json.name,
            email: json.email,
            password: json.password,
            phone: json.phone,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct JsonSuperAdminUpdate {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone: Option<String>,
}

impl From<JsonSuperAdminUpdate> for SuperAdminUpdate {
    fn from(json: JsonSuperAdminUpdate) -> Self {
        SuperAdminUpdate {
            name: json.name,
            email: json.email,
            password: json.password,
            phone: json.phone,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct SuperAdminQuery {
    include_inactive: Option<bool>,
}

pub async fn get_all(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    Query(query): Query<SuperAdminQuery>,
) -> ApiResult<Vec<JsonSuperAdmin>> {
    let filter = SuperAdminFilter {
        include_inactive: query.include_inactive.unwrap_or(false),
    };
    let admins = state.app.super_admin_service.get_super_admins(filter).await?;
    respond(
        StatusCode::OK,
        "Super admins fetched successfully",
        admins.into_iter().map(JsonSuperAdmin::from).collect(),
    )
}

pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    IdPath(id): IdPath,
) -> ApiResult<JsonSuperAdmin> {
    let admin = state.app.super_admin_service.get_super_admin(id).await?;
    respond(StatusCode::OK, "Super admin fetched successfully", admin.into())
}

pub async fn create(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    JsonBody(payload): JsonBody<JsonNewSuperAdmin>,
) -> ApiResult<JsonSuperAdmin> {
    let admin = state
        .app
        .super_admin_service
        .create_super_admin(payload.into())
        .await?;
    respond(StatusCode::CREATED, "Super admin created successfully", admin.into())
}

pub async fn update(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<JsonSuperAdminUpdate>,
) -> ApiResult<JsonSuperAdmin> {
    let admin = state
        .app
        .super_admin_service
        .update_super_admin(id, payload.into())
        .await?;
    respond(StatusCode::OK, "Super admin updated successfully", admin.into())
}

pub async fn delete(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    state.app.super_admin_service.delete_super_admin(id).await?;
    respond_message(StatusCode::OK, "Super admin deleted successfully")
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<JsonLogin>,
) -> ApiResult<JsonSuperAdmin> {
    let admin = state
        .app
        .super_admin_service
        .try_login(&payload.email, &payload.password)
        .await?;
    let token = generate_jwt(&Claims::new(admin.id, ActorRole::SuperAdmin))?;
    let body =
        Envelope::with_records("Login successful", JsonSuperAdmin::from(admin)).with_token(token);
    Ok((StatusCode::OK, Json(body)))
}

pub async fn upload_profile_image(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    IdPath(id): IdPath,
    multipart: Multipart,
) -> ApiResult<JsonSuperAdmin> {
    state.app.super_admin_service.get_super_admin(id).await?;
    let path = accept_upload(&state, multipart, "profile_image").await?;
    let admin = state
        .app
        .super_admin_service
        .set_profile_image(id, path.clone())
        .await
        .inspect_err(|e| log_orphaned_upload(&path, e))?;
    respond(StatusCode::OK, "Profile image uploaded successfully", admin.into())
}

#[cfg(test)]
mod tests {
    use crate::http::{into_json, test_state};

    use super::*;

    fn admin_auth() -> SuperAdminAuth {
        SuperAdminAuth(Claims::new(1, ActorRole::SuperAdmin))
    }

    fn new_admin(email: &str) -> JsonNewSuperAdmin {
        JsonNewSuperAdmin {
            name: "Root".into(),
            email: email.into(),
            password: "long enough".into(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_login() {
        let state = test_state();
        let (status, body) = into_json(
            create(State(state.clone()), admin_auth(), JsonBody(new_admin("root@x.com"))).await,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["records"].get("password").is_none());

        let credentials = JsonLogin {
            email: "root@x.com".into(),
            password: "long enough".into(),
        };
        let (status, body) = into_json(login(State(state), JsonBody(credentials)).await).await;
        assert_eq!(status, StatusCode::OK);
        let claims = crate::jwt::validate_jwt(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.role, ActorRole::SuperAdmin);
    }

    #[tokio::test]
    async fn test_short_password_is_unprocessable() {
        let mut payload = new_admin("root@x.com");
        payload.password = "short".into();
        let (status, _) =
            into_json(create(State(test_state()), admin_auth(), JsonBody(payload)).await).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_last_admin_is_kept() {
        let state = test_state();
        create(State(state.clone()), admin_auth(), JsonBody(new_admin("a@x.com")))
            .await
            .unwrap();
        create(State(state.clone()), admin_auth(), JsonBody(new_admin("b@x.com")))
            .await
            .unwrap();

        let (status, _) =
            into_json(delete(State(state.clone()), admin_auth(), IdPath(1)).await).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            into_json(delete(State(state.clone()), admin_auth(), IdPath(2)).await).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], true);

        let query = SuperAdminQuery {
            include_inactive: Some(true),
        };
        let (_, body) = into_json(get_all(State(state), admin_auth(), Query(query)).await).await;
        assert_eq!(body["records"].as_array().unwrap().len(), 2);
    }
}
