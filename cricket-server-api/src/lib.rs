use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cricket_server_domain::ServiceError;
use log::error;
use serde::Serialize;

pub mod auth;
pub mod config;
pub mod http;
pub mod jwt;
pub mod upload;

/// Body shape shared by every endpoint, successful or not.
#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<T>,
}

impl<T> Envelope<T> {
    pub fn with_records(message: impl Into<String>, records: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            token: None,
            records: Some(records),
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            token: None,
            records: None,
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

pub fn respond<T>(status: StatusCode, message: impl Into<String>, records: T) -> ApiResult<T> {
    Ok((status, Json(Envelope::with_records(message, records))))
}

pub fn respond_message(status: StatusCode, message: impl Into<String>) -> ApiResult<()> {
    Ok((status, Json(Envelope::message_only(message))))
}

#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServiceError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Invalid(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServiceError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = Envelope::<()> {
            error: true,
            message,
            token: None,
            records: None,
        };
        (status, Json(body)).into_response()
    }
}

/// `Json` that answers malformed bodies with a 400 envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError(ServiceError::BadRequest(rejection.body_text()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let cases = [
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Invalid("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
        ];
        for (error, status) in cases {
            let response = ApiError(error).into_response();
            assert_eq!(response.status(), status);
            let body = body_json(response).await;
            assert_eq!(body["error"], true);
            assert_eq!(body["message"], "x");
            assert!(body.get("records").is_none());
        }
    }

    #[tokio::test]
    async fn test_internal_detail_is_hidden() {
        let response = ApiError(ServiceError::Internal("disk I/O error".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let result = JsonBody::<serde_json::Value>::from_request(request, &()).await;
        let Err(ApiError(ServiceError::BadRequest(_))) = result else {
            panic!("expected a bad request");
        };
    }
}
