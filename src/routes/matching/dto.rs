use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::SubmissionStatus;
use crate::entities::target_course;
use crate::routes::submissions::dto::TransferCourseResponse;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AnalyzeRequest {
    pub submission_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub message: String,
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TargetCourseSummary {
    pub course_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub credits: f64,
    pub department: Option<String>,
}

impl From<target_course::Model> for TargetCourseSummary {
    fn from(course: target_course::Model) -> Self {
        Self {
            course_id: course.course_id,
            course_code: course.course_code,
            course_name: course.course_name,
            credits: course.credits,
            department: course.department,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub target_course: Option<TargetCourseSummary>,
    pub similarity_score: f64,
    pub explanation: Option<String>,
    pub key_similarities: Option<Value>,
    pub important_differences: Option<Value>,
    pub recommendation: Option<String>,
    pub rank: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseMatchGroup {
    pub transfer_course: TransferCourseResponse,
    pub matches: Vec<MatchResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchResultsResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    pub results: Vec<CourseMatchGroup>,
}
