use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::db::{AccountStore, MemoryAccountStore, PgAccountStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store = if config.uses_memory_store() {
            tracing::warn!("DATABASE_URL selects the in-memory store; data is lost on exit");
            Arc::new(MemoryAccountStore::new()) as Arc<dyn AccountStore>
        } else {
            let pg = PgAccountStore::connect(&config.database_url).await?;
            if let Err(e) = pg.migrate().await {
                tracing::warn!(error = %e, "migration failed; continuing");
            }
            Arc::new(pg) as Arc<dyn AccountStore>
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn AccountStore>, config: AppConfig) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            store,
            config: Arc::new(config),
            keys,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = AppConfig {
            database_url: "memory:".into(),
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60,
            },
            host: "127.0.0.1".into(),
            port: 0,
            static_dir: "dist".into(),
            reports_require_auth: false,
        };
        Self::from_parts(Arc::new(MemoryAccountStore::new()), config)
    }
}
