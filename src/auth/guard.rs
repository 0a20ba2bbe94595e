use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tracing::warn;

use super::jwt::{Claims, JwtKeys};
use crate::{error::ApiError, state::AppState};

/// How a group of routes is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Bearer,
}

impl Access {
    /// Layer the bearer check onto `router` when the group requires it.
    pub fn guard(self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        match self {
            Access::Public => router,
            Access::Bearer => {
                router.route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
            }
        }
    }
}

fn bearer_claims(headers: &HeaderMap, keys: &JwtKeys) -> Result<Claims, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Access denied".into()))?;

    keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        ApiError::Unauthorized("Invalid token".into())
    })
}

pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = bearer_claims(req.headers(), &state.keys)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Verified caller identity. Reuses the claims left by [`require_bearer`] when present.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(AuthUser(claims.clone()));
        }
        let keys = JwtKeys::from_ref(state);
        bearer_claims(&parts.headers, &keys).map(AuthUser)
    }
}
