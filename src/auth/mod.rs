use crate::state::AppState;
use axum::Router;

mod dto;
pub mod guard;
mod handlers;
pub mod jwt;
mod password;
pub mod services;

pub use guard::Access;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(Access::Bearer.guard(handlers::protected_routes(), state))
}
