use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::SubmissionStatus;
use crate::entities::{submission, transfer_course};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateSubmissionRequest {
    pub target_university_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransferCourseResponse {
    pub transfer_course_id: Uuid,
    pub course_code: Option<String>,
    pub course_name: String,
    pub credits: Option<f64>,
    pub grade: Option<String>,
    pub source_university_name: Option<String>,
    pub syllabus_file_path: Option<String>,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub additional_notes: Option<String>,
}

impl From<transfer_course::Model> for TransferCourseResponse {
    fn from(course: transfer_course::Model) -> Self {
        Self {
            transfer_course_id: course.transfer_course_id,
            course_code: course.course_code,
            course_name: course.course_name,
            credits: course.credits,
            grade: course.grade,
            source_university_name: course.source_university_name,
            syllabus_file_path: course.syllabus_file_path,
            description: course.description,
            learning_outcomes: course.learning_outcomes,
            additional_notes: course.additional_notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub submission_id: Uuid,
    pub student_id: Uuid,
    pub target_university_id: Uuid,
    pub transcript_file_path: Option<String>,
    pub status: SubmissionStatus,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub transfer_courses: Vec<TransferCourseResponse>,
}

impl SubmissionResponse {
    pub fn from_parts(
        submission: submission::Model,
        transfer_courses: Vec<transfer_course::Model>,
    ) -> Self {
        Self {
            submission_id: submission.submission_id,
            student_id: submission.student_id,
            target_university_id: submission.target_university_id,
            transcript_file_path: submission.transcript_file_path,
            status: submission.status,
            notes: submission.notes,
            created_at: submission.created_at,
            transfer_courses: transfer_courses
                .into_iter()
                .map(TransferCourseResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddTransferCourseRequest {
    pub course_code: Option<String>,

    #[schema(example = "Data Structures")]
    pub course_name: String,

    pub credits: Option<f64>,
    pub grade: Option<String>,
    pub source_university_name: Option<String>,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub additional_notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionStatusResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    pub courses_count: u64,
    /// Transfer courses already carrying a terminal decision
    pub evaluated_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub file_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitForReviewResponse {
    pub message: String,
    pub status: SubmissionStatus,
}
