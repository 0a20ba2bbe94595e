use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    /// Put report routes behind the bearer guard and require the token to own `:userId`.
    pub reports_require_auth: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "reportbook".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "reportbook-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        Ok(Self {
            database_url,
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(5000),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "dist".into()),
            reports_require_auth: std::env::var("REPORTS_REQUIRE_AUTH")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    /// Whether `DATABASE_URL` selects the in-process store.
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_prefix_selects_in_process_store() {
        let mut config = crate::state::AppState::fake().config.as_ref().clone();
        config.database_url = "memory:".into();
        assert!(config.uses_memory_store());
        config.database_url = "postgres://localhost/reportbook".into();
        assert!(!config.uses_memory_store());
    }
}
