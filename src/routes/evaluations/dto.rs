use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::evaluation;
use crate::entities::sea_orm_active_enums::{EvaluationDecision, SubmissionStatus};
use crate::routes::matching::dto::MatchResponse;
use crate::routes::submissions::dto::TransferCourseResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingReviewResponse {
    pub submission_id: Uuid,
    pub student_id: Uuid,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub target_university_id: Uuid,
    pub target_university_name: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: chrono::NaiveDateTime,
    pub transfer_courses_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EvaluationResponse {
    pub evaluation_id: Uuid,
    pub submission_id: Uuid,
    pub transfer_course_id: Uuid,
    pub evaluator_id: Uuid,
    pub decision: EvaluationDecision,
    pub approved_target_course_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<evaluation::Model> for EvaluationResponse {
    fn from(evaluation: evaluation::Model) -> Self {
        Self {
            evaluation_id: evaluation.evaluation_id,
            submission_id: evaluation.submission_id,
            transfer_course_id: evaluation.transfer_course_id,
            evaluator_id: evaluation.evaluator_id,
            decision: evaluation.decision,
            approved_target_course_id: evaluation.approved_target_course_id,
            notes: evaluation.notes,
            created_at: evaluation.created_at,
            updated_at: evaluation.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DecisionRequest {
    pub transfer_course_id: Uuid,

    #[schema(example = "approved")]
    pub decision: EvaluationDecision,

    /// Required when decision is `approved`, must be absent otherwise
    pub approved_target_course_id: Option<Uuid>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateDecisionRequest {
    #[schema(example = "rejected")]
    pub decision: EvaluationDecision,

    pub approved_target_course_id: Option<Uuid>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RejectSubmissionRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonSummary {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UniversitySummary {
    pub university_id: Uuid,
    pub name: String,
}

/// One transfer course as the evaluator reviews it: the student's entry, the
/// ranked AI candidates and the current decision, if any
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseReviewDetail {
    pub transfer_course: TransferCourseResponse,
    pub matches: Vec<MatchResponse>,
    pub evaluation: Option<EvaluationResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionDetailResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    pub created_at: chrono::NaiveDateTime,
    pub transcript_file_path: Option<String>,
    pub notes: Option<String>,
    pub student: Option<PersonSummary>,
    pub target_university: Option<UniversitySummary>,
    pub transfer_courses: Vec<CourseReviewDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionCounts {
    pub total: u64,
    pub pending: u64,
    pub completed: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EvaluationCounts {
    pub total: u64,
    pub approved: u64,
    pub rejected: u64,
    pub needs_info: u64,
    pub approval_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportsSummaryResponse {
    pub submissions: SubmissionCounts,
    pub evaluations: EvaluationCounts,
}
