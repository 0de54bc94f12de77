use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::SubmissionStatus;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserCounts {
    pub total: u64,
    pub students: u64,
    pub professors: u64,
    pub evaluators: u64,
    pub admins: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContentCounts {
    pub universities: u64,
    pub courses: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionPipelineCounts {
    pub total: u64,
    /// Everything submitted but not yet terminal
    pub in_flight: u64,
    pub completed: u64,
    pub rejected: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EvaluationOutcomeCounts {
    pub total: u64,
    pub approved: u64,
    pub rejected: u64,
    pub approval_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub users: UserCounts,
    pub content: ContentCounts,
    pub submissions: SubmissionPipelineCounts,
    pub evaluations: EvaluationOutcomeCounts,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AdminSubmissionQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub status: Option<SubmissionStatus>,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSubmissionRow {
    pub submission_id: Uuid,
    pub student_email: Option<String>,
    pub target_university: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: chrono::NaiveDateTime,
    pub courses_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSubmissionListResponse {
    pub submissions: Vec<AdminSubmissionRow>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}
