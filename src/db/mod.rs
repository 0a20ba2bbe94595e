use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod models;
mod postgres;

pub use memory::MemoryAccountStore;
pub use models::{NewUser, Report, ReportFields, User};
pub use postgres::PgAccountStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0}")]
    Conflict(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for users and the reports they own.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Reports of `user_id` in insertion order.
    async fn list_reports(&self, user_id: Uuid) -> Result<Vec<Report>, StoreError>;
    async fn insert_report(&self, user_id: Uuid, fields: ReportFields) -> Result<Report, StoreError>;

    /// Overwrites title and description. `None` if no report `report_id` belongs to `user_id`.
    async fn update_report(
        &self,
        user_id: Uuid,
        report_id: Uuid,
        fields: ReportFields,
    ) -> Result<Option<Report>, StoreError>;
}
