mod dto;
mod handlers;
pub mod services;

use crate::{auth::Access, state::AppState};
use axum::Router;

pub fn router(state: &AppState) -> Router<AppState> {
    let access = if state.config.reports_require_auth {
        Access::Bearer
    } else {
        Access::Public
    };
    access.guard(handlers::report_routes(), state)
}
