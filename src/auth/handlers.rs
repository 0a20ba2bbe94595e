use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{LoginRequest, LoginResponse, MessageResponse, ProtectedResponse, PublicUser, RegisterRequest},
    guard::AuthUser,
    services,
};
use crate::{error::ApiError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/api/protected", get(protected))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(payload) = payload?;
    services::register(state.store.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    let outcome = services::login(state.store.as_ref(), &state.keys, payload).await?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        token: outcome.token,
        user: PublicUser::new(outcome.user, outcome.reports),
    }))
}

#[instrument(skip_all, fields(user_id = %claims.id))]
pub async fn protected(AuthUser(claims): AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Protected content",
        user: claims,
    })
}
