use tracing::{debug, info};
use uuid::Uuid;

use super::dto::ReportRequest;
use crate::{
    db::{AccountStore, Report, ReportFields, User},
    error::{required, ApiError},
};

fn report_fields(req: ReportRequest) -> Result<ReportFields, ApiError> {
    match (required(req.title), required(req.description)) {
        (Some(title), Some(description)) => Ok(ReportFields { title, description }),
        _ => Err(ApiError::validation("Title and description are required")),
    }
}

async fn owner(store: &dyn AccountStore, user_id: Uuid) -> Result<User, ApiError> {
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Appends a report and returns the owner's full list.
pub async fn add_report(
    store: &dyn AccountStore,
    user_id: Uuid,
    req: ReportRequest,
) -> Result<Vec<Report>, ApiError> {
    let fields = report_fields(req)?;
    let user = owner(store, user_id).await?;

    let report = store.insert_report(user.id, fields).await?;
    info!(user_id = %user.id, report_id = %report.id, "report added");

    Ok(store.list_reports(user.id).await?)
}

pub async fn list_reports(store: &dyn AccountStore, user_id: Uuid) -> Result<Vec<Report>, ApiError> {
    let user = owner(store, user_id).await?;
    let reports = store.list_reports(user.id).await?;
    debug!(user_id = %user.id, count = reports.len(), "reports listed");
    Ok(reports)
}

pub async fn update_report(
    store: &dyn AccountStore,
    user_id: Uuid,
    report_id: Uuid,
    req: ReportRequest,
) -> Result<Report, ApiError> {
    let fields = report_fields(req)?;
    let user = owner(store, user_id).await?;

    let report = store
        .update_report(user.id, report_id, fields)
        .await?
        .ok_or_else(|| ApiError::not_found("Report not found"))?;
    info!(user_id = %user.id, report_id = %report.id, "report updated");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryAccountStore, NewUser};

    fn req(title: &str, description: &str) -> ReportRequest {
        ReportRequest {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    async fn store_with_user() -> (MemoryAccountStore, Uuid) {
        let store = MemoryAccountStore::new();
        let user = store
            .create_user(NewUser {
                username: "alice".into(),
                email: "a@x.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        (store, user.id)
    }

    #[tokio::test]
    async fn add_then_list_returns_the_report() {
        let (store, user_id) = store_with_user().await;

        let added = add_report(&store, user_id, req("T", "D")).await.unwrap();
        assert_eq!(added.len(), 1);

        let listed = list_reports(&store, user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "T");
        assert_eq!(listed[0].description, "D");
        assert_eq!(listed[0], added[0]);
        assert!(!listed[0].id.is_nil());
    }

    #[tokio::test]
    async fn add_requires_title_and_description() {
        let (store, user_id) = store_with_user().await;
        let err = add_report(
            &store,
            user_id,
            ReportRequest {
                title: Some("T".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Title and description are required"));
        assert!(list_reports(&store, user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (store, _) = store_with_user().await;
        let stranger = Uuid::new_v4();

        let err = add_report(&store, stranger, req("T", "D")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "User not found"));
        let err = list_reports(&store, stranger).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_changes_fields_and_keeps_identity() {
        let (store, user_id) = store_with_user().await;
        let original = add_report(&store, user_id, req("T", "D")).await.unwrap().remove(0);

        let updated = update_report(&store, user_id, original.id, req("T2", "D2"))
            .await
            .unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.timestamp, original.timestamp);
        assert_eq!(updated.title, "T2");
        assert_eq!(updated.description, "D2");
    }

    #[tokio::test]
    async fn update_unknown_report_is_not_found() {
        let (store, user_id) = store_with_user().await;
        let err = update_report(&store, user_id, Uuid::new_v4(), req("T2", "D2"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Report not found"));
    }
}
