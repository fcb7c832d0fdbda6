use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, instrument};

use crate::{
    auth::{
        dto::{RegisterRequest, RegisterResponse},
        services::RegisterError,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), (StatusCode, String)> {
    let res = state.registration.register(payload).await.map_err(into_status)?;
    Ok((StatusCode::CREATED, Json(res)))
}

fn into_status(e: RegisterError) -> (StatusCode, String) {
    match e {
        RegisterError::Validation(msg) | RegisterError::Conflict(msg) => {
            (StatusCode::BAD_REQUEST, msg.to_string())
        }
        RegisterError::Internal(e) => {
            error!(error = %e, "register failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
