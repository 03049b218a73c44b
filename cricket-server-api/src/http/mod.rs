use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequestParts, Multipart, Path},
    http::{HeaderValue, StatusCode, request::Parts},
    routing::{get, post},
};
use cricket_server_domain::{DEFAULT_SPORT_TYPE, RecordId, ServiceError, app::Application};
use log::{info, warn};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    ApiError, Envelope,
    auth::{RevokedTokens, revoked_tokens},
    config::ApiConfig,
    upload::{self, PUBLIC_PREFIX},
};

mod clubs;
mod coaches;
mod player_roles;
mod players;
mod session;
mod super_admins;
mod teams;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub app: Application,
    pub config: Arc<ApiConfig>,
    pub revoked_tokens: RevokedTokens,
}

impl AppState {
    pub fn new(app: Application, config: ApiConfig) -> Self {
        Self {
            app,
            config: Arc::new(config),
            revoked_tokens: revoked_tokens(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = DefaultBodyLimit::max(state.config.upload_max_bytes + MULTIPART_OVERHEAD);
    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/health", get(health))
        .route("/auth/logout", post(session::logout))
        .route("/auth/me", get(session::me))
        .route("/players", get(players::get_all).post(players::create))
        .route("/players/login", post(players::login))
        .route(
            "/players/{id}",
            get(players::get_by_id)
                .put(players::update)
                .delete(players::delete),
        )
        .route(
            "/players/{id}/profile-image",
            post(players::upload_profile_image),
        )
        .route("/coaches", get(coaches::get_all).post(coaches::create))
        .route("/coaches/login", post(coaches::login))
        .route(
            "/coaches/{id}",
            get(coaches::get_by_id)
                .put(coaches::update)
                .delete(coaches::delete),
        )
        .route(
            "/coaches/{id}/profile-image",
            post(coaches::upload_profile_image),
        )
        .route("/clubs", get(clubs::get_all).post(clubs::create))
        .route("/clubs/login", post(clubs::login))
        .route(
            "/clubs/{id}",
            get(clubs::get_by_id).put(clubs::update).delete(clubs::delete),
        )
        .route("/clubs/{id}/logo", post(clubs::upload_logo))
        .route(
            "/super-admins",
            get(super_admins::get_all).post(super_admins::create),
        )
        .route("/super-admins/login", post(super_admins::login))
        .route(
            "/super-admins/{id}",
            get(super_admins::get_by_id)
                .put(super_admins::update)
                .delete(super_admins::delete),
        )
        .route(
            "/super-admins/{id}/profile-image",
            post(super_admins::upload_profile_image),
        )
        .route("/teams", get(teams::get_all).post(teams::create))
        .route(
            "/teams/{id}",
            get(teams::get_by_id).put(teams::update).delete(teams::delete),
        )
        .route("/teams/{id}/logo", post(teams::upload_logo))
        .route(
            "/player-roles",
            get(player_roles::get_all).post(player_roles::create),
        )
        .route(
            "/player-roles/{id}",
            get(player_roles::get_by_id)
                .put(player_roles::update)
                .delete(player_roles::delete),
        )
        .nest_service(&format!("/{}", PUBLIC_PREFIX), uploads)
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

pub async fn serve(
    state: AppState,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let address = state.config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("API server listening on {}", address);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health() -> (StatusCode, Json<Envelope<()>>) {
    (StatusCode::OK, Json(Envelope::message_only("Server is running")))
}

/// Numeric `{id}` path segment, rejected with a 400 envelope otherwise.
pub struct IdPath(pub RecordId);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<RecordId>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError(ServiceError::BadRequest("Invalid id".to_string())))?;
        Ok(IdPath(id))
    }
}

#[derive(serde::Deserialize)]
pub struct JsonLogin {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn default_sport_type() -> String {
    DEFAULT_SPORT_TYPE.to_string()
}

/// Reads and stores the uploaded file, returning its public path.
async fn accept_upload(
    state: &AppState,
    multipart: Multipart,
    field_name: &str,
) -> Result<String, ApiError> {
    let file = upload::read_file_field(multipart, field_name).await?;
    Ok(upload::store_upload(&state.config, &file).await?)
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use cricket_server_domain::app::{Repositories, build_application};

    AppState::new(
        build_application(Repositories::in_memory()),
        ApiConfig::default(),
    )
}

#[cfg(test)]
pub(crate) async fn into_json<T: serde::Serialize>(
    result: crate::ApiResult<T>,
) -> (StatusCode, serde_json::Value) {
    use axum::response::IntoResponse;

    let response = result.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (status, Json(body)) = health().await;
        assert_eq!(status, StatusCode::OK);
        let body = serde_json::to_value(&body).unwrap();
        assert_eq!(body["error"], false);
        assert!(body.get("records").is_none());
    }

    #[test]
    fn test_router_builds() {
        let _ = router(test_state());
    }

    struct TestServer {
        base: String,
        client: reqwest::Client,
    }

    impl TestServer {
        async fn start() -> Self {
            use cricket_server_domain::app::{Repositories, build_application};

            let config = ApiConfig {
                upload_dir: std::env::temp_dir()
                    .join(format!("cricket-router-{}", uuid::Uuid::new_v4())),
                ..Default::default()
            };
            let state = AppState::new(build_application(Repositories::in_memory()), config);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let address = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, router(state)).await });
            Self {
                base: format!("http://{}", address),
                client: reqwest::Client::new(),
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }

        async fn send(&self, request: reqwest::RequestBuilder) -> (u16, serde_json::Value) {
            let response = request.send().await.unwrap();
            let status = response.status().as_u16();
            (status, response.json().await.unwrap())
        }

        fn image(name: &str) -> reqwest::multipart::Form {
            let data = b"\x89PNG fake".to_vec();
            let part = reqwest::multipart::Part::bytes(data).file_name(name.to_string());
            reqwest::multipart::Form::new().part("profile_image", part)
        }
    }

    #[tokio::test]
    async fn test_routes_over_http() {
        let server = TestServer::start().await;
        let coach = serde_json::json!({
            "name": "A",
            "email": "a@x.com",
            "password": "secret1",
            "phone": "123",
        });

        let (status, body) = server
            .send(server.client.post(server.url("/coaches")).json(&coach))
            .await;
        assert_eq!(status, 201);
        assert!(body["records"].get("password").is_none());
        let (status, _) = server
            .send(server.client.post(server.url("/coaches")).json(&coach))
            .await;
        assert_eq!(status, 409);

        let (status, body) = server
            .send(
                server
                    .client
                    .post(server.url("/coaches/login"))
                    .json(&serde_json::json!({"email": "a@x.com", "password": "secret1"})),
            )
            .await;
        assert_eq!(status, 200);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = server
            .send(
                server
                    .client
                    .put(server.url("/coaches/1"))
                    .bearer_auth(&token)
                    .json(&serde_json::json!({"phone": null, "name": "   "})),
            )
            .await;
        assert_eq!(status, 422);
        assert_eq!(body["error"], true);

        let (status, _) = server.send(server.client.delete(server.url("/coaches/1"))).await;
        assert_eq!(status, 401);
        let (status, _) = server
            .send(server.client.delete(server.url("/coaches/2")).bearer_auth(&token))
            .await;
        assert_eq!(status, 403);
        let (status, _) = server
            .send(
                server
                    .client
                    .post(server.url("/player-roles"))
                    .bearer_auth(&token)
                    .json(&serde_json::json!({"name": "Fielder"})),
            )
            .await;
        assert_eq!(status, 403);

        let (status, _) = server
            .send(
                server
                    .client
                    .post(server.url("/coaches/1/profile-image"))
                    .bearer_auth(&token)
                    .multipart(TestServer::image("setup.exe")),
            )
            .await;
        assert_eq!(status, 400);
        let (status, body) = server
            .send(
                server
                    .client
                    .post(server.url("/coaches/1/profile-image"))
                    .bearer_auth(&token)
                    .multipart(TestServer::image("me.png")),
            )
            .await;
        assert_eq!(status, 200);
        let image = body["records"]["profile_image"].as_str().unwrap().to_string();
        assert!(image.starts_with("uploads/"));
        let served = server
            .client
            .get(server.url(&format!("/{}", image)))
            .send()
            .await
            .unwrap();
        assert_eq!(served.status().as_u16(), 200);
        assert_eq!(served.bytes().await.unwrap().as_ref(), b"\x89PNG fake");

        let (status, _) = server
            .send(server.client.post(server.url("/auth/logout")).bearer_auth(&token))
            .await;
        assert_eq!(status, 200);
        let (status, body) = server
            .send(server.client.get(server.url("/auth/me")).bearer_auth(&token))
            .await;
        assert_eq!(status, 401);
        assert_eq!(body["message"], "Token has been revoked");
    }
}
