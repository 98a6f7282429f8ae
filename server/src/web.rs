use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{ServerError, PROTOCOL_VERSION};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub protocol_version: u32,
}

/// Liveness probe
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        protocol_version: PROTOCOL_VERSION,
    })
}

/// Missing snapshots answer 404 with the error as JSON
#[derive(Debug)]
pub struct ApiError(pub ServerError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, Json(self.0)).into_response()
    }
}

impl From<ServerError> for ApiError {
    fn from(error: ServerError) -> Self {
        ApiError(error)
    }
}
