use anyhow::Context;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
};
use crate::{
    db::{AccountStore, NewUser, Report, StoreError, User},
    error::{required, ApiError},
};

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
    pub reports: Vec<Report>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(store: &dyn AccountStore, req: RegisterRequest) -> Result<User, ApiError> {
    let (Some(username), Some(email), Some(password)) = (
        required(req.username),
        required(req.email),
        required(req.password),
    ) else {
        return Err(ApiError::validation("All fields are required"));
    };
    let email = normalize_email(&email);

    if store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("join password hashing task")??;

    let user = store
        .create_user(NewUser {
            username: username.trim().to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(field) => {
                warn!(field, "unique constraint hit on register");
                ApiError::Conflict("User already exists".into())
            }
            other => other.into(),
        })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn login(
    store: &dyn AccountStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<LoginOutcome, ApiError> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(ApiError::validation("All fields are required"));
    };
    let email = normalize_email(&email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::not_found("User not found"));
    };

    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("join password verification task")??;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = keys.issue(user.id).context("sign login token")?;
    let reports = store.list_reports(user.id).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(LoginOutcome {
        token,
        user,
        reports,
    })
}
