use serde::{Deserialize, Serialize};

use crate::db::Report;

/// Body of both add and update requests.
#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportAddedResponse {
    pub message: &'static str,
    pub reports: Vec<Report>,
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<Report>,
}

#[derive(Debug, Serialize)]
pub struct ReportUpdatedResponse {
    pub message: &'static str,
    pub report: Report,
}
