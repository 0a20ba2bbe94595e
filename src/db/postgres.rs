use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{AccountStore, NewUser, Report, ReportFields, StoreError, User};

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

fn map_unique(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("username") => "username",
                _ => "email",
            };
            return StoreError::Conflict(field);
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.db)
        .await
        .map_err(map_unique)?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn list_reports(&self, user_id: Uuid) -> Result<Vec<Report>, StoreError> {
        let rows = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, user_id, title, description, timestamp
            FROM reports
            WHERE user_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_report(&self, user_id: Uuid, fields: ReportFields) -> Result<Report, StoreError> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (id, user_id, title, description, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, timestamp
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.db)
        .await?;
        Ok(report)
    }

    async fn update_report(
        &self,
        user_id: Uuid,
        report_id: Uuid,
        fields: ReportFields,
    ) -> Result<Option<Report>, StoreError> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
               SET title = $3, description = $4
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, timestamp
            "#,
        )
        .bind(report_id)
        .bind(user_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .fetch_optional(&self.db)
        .await?;
        Ok(report)
    }
}
