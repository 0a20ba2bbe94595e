use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, NewUser, Report, ReportFields, StoreError, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // insertion order doubles as list order
    reports: Vec<Report>,
}

/// In-process store used for tests and `DATABASE_URL=memory:`.
#[derive(Default)]
pub struct MemoryAccountStore {
    tables: RwLock<Tables>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict("email"));
        }
        if tables.users.iter().any(|u| u.username == new.username) {
            return Err(StoreError::Conflict("username"));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_reports(&self, user_id: Uuid) -> Result<Vec<Report>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reports
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_report(&self, user_id: Uuid, fields: ReportFields) -> Result<Report, StoreError> {
        let mut tables = self.tables.write().await;
        let report = Report {
            id: Uuid::new_v4(),
            user_id,
            title: fields.title,
            description: fields.description,
            timestamp: OffsetDateTime::now_utc(),
        };
        tables.reports.push(report.clone());
        Ok(report)
    }

    async fn update_report(
        &self,
        user_id: Uuid,
        report_id: Uuid,
        fields: ReportFields,
    ) -> Result<Option<Report>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(report) = tables
            .reports
            .iter_mut()
            .find(|r| r.id == report_id && r.user_id == user_id)
        else {
            return Ok(None);
        };
        report.title = fields.title;
        report.description = fields.description;
        Ok(Some(report.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    fn fields(title: &str, description: &str) -> ReportFields {
        ReportFields {
            title: title.into(),
            description: description.into(),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email_and_username() {
        let store = MemoryAccountStore::new();
        store.create_user(new_user("alice", "a@x.com")).await.unwrap();

        let err = store.create_user(new_user("bob", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("email")));

        let err = store.create_user(new_user("alice", "b@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("username")));
    }

    #[tokio::test]
    async fn reports_keep_insertion_order_per_user() {
        let store = MemoryAccountStore::new();
        let alice = store.create_user(new_user("alice", "a@x.com")).await.unwrap();
        let bob = store.create_user(new_user("bob", "b@x.com")).await.unwrap();

        store.insert_report(alice.id, fields("first", "1")).await.unwrap();
        store.insert_report(bob.id, fields("other", "x")).await.unwrap();
        store.insert_report(alice.id, fields("second", "2")).await.unwrap();

        let titles: Vec<_> = store
            .list_reports(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn update_is_scoped_to_owner() {
        let store = MemoryAccountStore::new();
        let alice = store.create_user(new_user("alice", "a@x.com")).await.unwrap();
        let bob = store.create_user(new_user("bob", "b@x.com")).await.unwrap();
        let report = store.insert_report(alice.id, fields("T", "D")).await.unwrap();

        let stolen = store
            .update_report(bob.id, report.id, fields("X", "Y"))
            .await
            .unwrap();
        assert!(stolen.is_none());

        let updated = store
            .update_report(alice.id, report.id, fields("T2", "D2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, report.id);
        assert_eq!(updated.timestamp, report.timestamp);
        assert_eq!(updated.title, "T2");
    }
}
