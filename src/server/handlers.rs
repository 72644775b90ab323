// file: src/server/handlers.rs
// description: request handlers of the dataface service

use super::AppState;
use crate::datafaces::Dataface;
use crate::error::XchembkuError;
use crate::protocol::{DatafaceRequest, ProtocolError, ProtocolResponse};
use crate::utils::HealthReport;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Wraps the library error so handlers can return it with `?`.
pub struct ApiError(pub XchembkuError);

impl From<XchembkuError> for ApiError {
    fn from(e: XchembkuError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "dataface request failed");
        } else {
            tracing::warn!(error = %self.0, "dataface request rejected");
        }
        (
            status,
            Json(ProtocolError {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub async fn protocolj(
    State(state): State<AppState>,
    Json(request): Json<DatafaceRequest>,
) -> Result<Json<ProtocolResponse>, ApiError> {
    tracing::debug!(function = request.function(), "protocolj request");
    let payload = request.dispatch(state.dataface.as_ref()).await?;
    Ok(Json(ProtocolResponse { payload }))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthReport>, ApiError> {
    Ok(Json(state.dataface.report_health().await?))
}
