use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{
    dto::{ReportAddedResponse, ReportListResponse, ReportRequest, ReportUpdatedResponse},
    services,
};
use crate::{auth::jwt::Claims, error::ApiError, state::AppState};

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users/:user_id/reports",
            get(list_reports).post(add_report),
        )
        .route("/api/users/:user_id/reports/:report_id", put(update_report))
}

// Stored ids are v4, so nil never matches and a malformed id ends up as NotFound
// after body validation has run.
fn parse_id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::nil())
}

/// When the guard ran, the token must belong to the user in the path.
fn ensure_owner(claims: Option<Extension<Claims>>, user_id: Uuid) -> Result<(), ApiError> {
    match claims {
        Some(Extension(claims)) if claims.id != user_id => {
            warn!(caller = %claims.id, %user_id, "report access for another user");
            Err(ApiError::Forbidden)
        }
        _ => Ok(()),
    }
}

#[instrument(skip(state, claims, payload))]
pub async fn add_report(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    claims: Option<Extension<Claims>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReportAddedResponse>), ApiError> {
    let Json(payload) = payload?;
    let user_id = parse_id(&user_id);
    ensure_owner(claims, user_id)?;

    let reports = services::add_report(state.store.as_ref(), user_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReportAddedResponse {
            message: "Report added successfully",
            reports,
        }),
    ))
}

#[instrument(skip(state, claims))]
pub async fn list_reports(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    claims: Option<Extension<Claims>>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let user_id = parse_id(&user_id);
    ensure_owner(claims, user_id)?;

    let reports = services::list_reports(state.store.as_ref(), user_id).await?;
    Ok(Json(ReportListResponse { reports }))
}

#[instrument(skip(state, claims, payload))]
pub async fn update_report(
    State(state): State<AppState>,
    Path((user_id, report_id)): Path<(String, String)>,
    claims: Option<Extension<Claims>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportUpdatedResponse>, ApiError> {
    let Json(payload) = payload?;
    let user_id = parse_id(&user_id);
    ensure_owner(claims, user_id)?;

    let report =
        services::update_report(state.store.as_ref(), user_id, parse_id(&report_id), payload)
            .await?;
    Ok(Json(ReportUpdatedResponse {
        message: "Report updated successfully",
        report,
    }))
}
