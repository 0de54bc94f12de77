use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::entities::sea_orm_active_enums::{
    CourseLevel, EvaluationDecision, RoleEnum, SubmissionStatus,
};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::route::health_check,
        routes::auth::route::register,
        routes::auth::route::login,
        routes::auth::route::logout,
        routes::auth::route::get_me,
        routes::auth::route::update_me,
        routes::users::route::create_user,
        routes::users::route::get_all_users,
        routes::users::route::get_user_by_id,
        routes::users::route::update_user,
        routes::users::route::delete_user,
        routes::universities::route::list_universities,
        routes::universities::route::get_university,
        routes::universities::route::get_university_courses,
        routes::universities::route::create_university,
        routes::courses::route::create_course,
        routes::courses::route::get_course,
        routes::courses::route::update_course,
        routes::courses::route::delete_course,
        routes::courses::route::import_catalog,
        routes::submissions::route::create_submission,
        routes::submissions::route::get_submissions,
        routes::submissions::route::get_submission,
        routes::submissions::route::get_submission_status,
        routes::submissions::route::delete_submission,
        routes::submissions::route::upload_transcript,
        routes::submissions::route::add_transfer_course,
        routes::submissions::route::upload_syllabus,
        routes::submissions::route::submit_for_review,
        routes::submissions::route::get_submission_matches,
        routes::matching::route::analyze_submission,
        routes::matching::route::get_match_results,
        routes::evaluations::route::get_pending_reviews,
        routes::evaluations::route::get_submission_detail,
        routes::evaluations::route::record_decision,
        routes::evaluations::route::update_decision,
        routes::evaluations::route::reject_submission,
        routes::evaluations::route::get_reports_summary,
        routes::stats::route::get_analytics,
        routes::stats::route::list_all_submissions,
    ),
    components(schemas(
        RoleEnum,
        SubmissionStatus,
        EvaluationDecision,
        CourseLevel,
        routes::auth::dto::RegisterRequest,
        routes::auth::dto::LoginRequest,
        routes::auth::dto::UserResponse,
        routes::auth::dto::TokenResponse,
        routes::auth::dto::LogoutResponse,
        routes::auth::dto::UpdateMeRequest,
        routes::users::dto::CreateUserRequest,
        routes::users::dto::UpdateUserRequest,
        routes::users::dto::UserListResponse,
        routes::users::dto::DeleteUserResponse,
        routes::universities::dto::CreateUniversityRequest,
        routes::universities::dto::UniversityResponse,
        routes::courses::dto::CreateCourseRequest,
        routes::courses::dto::UpdateCourseRequest,
        routes::courses::dto::CourseResponse,
        routes::courses::dto::CatalogImportResponse,
        routes::courses::dto::DeleteCourseResponse,
        routes::submissions::dto::CreateSubmissionRequest,
        routes::submissions::dto::SubmissionResponse,
        routes::submissions::dto::TransferCourseResponse,
        routes::submissions::dto::AddTransferCourseRequest,
        routes::submissions::dto::SubmissionStatusResponse,
        routes::submissions::dto::UploadResponse,
        routes::submissions::dto::SubmitForReviewResponse,
        routes::matching::dto::AnalyzeRequest,
        routes::matching::dto::AnalyzeResponse,
        routes::matching::dto::TargetCourseSummary,
        routes::matching::dto::MatchResponse,
        routes::matching::dto::CourseMatchGroup,
        routes::matching::dto::MatchResultsResponse,
        routes::evaluations::dto::PendingReviewResponse,
        routes::evaluations::dto::EvaluationResponse,
        routes::evaluations::dto::DecisionRequest,
        routes::evaluations::dto::UpdateDecisionRequest,
        routes::evaluations::dto::RejectSubmissionRequest,
        routes::evaluations::dto::PersonSummary,
        routes::evaluations::dto::UniversitySummary,
        routes::evaluations::dto::CourseReviewDetail,
        routes::evaluations::dto::SubmissionDetailResponse,
        routes::evaluations::dto::SubmissionCounts,
        routes::evaluations::dto::EvaluationCounts,
        routes::evaluations::dto::ReportsSummaryResponse,
        routes::stats::dto::UserCounts,
        routes::stats::dto::ContentCounts,
        routes::stats::dto::SubmissionPipelineCounts,
        routes::stats::dto::EvaluationOutcomeCounts,
        routes::stats::dto::AnalyticsResponse,
        routes::stats::dto::AdminSubmissionRow,
        routes::stats::dto::AdminSubmissionListResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Login, registration and profile"),
        (name = "Student Portal", description = "Submissions and uploads"),
        (name = "Universities", description = "Institutions and their catalogs"),
        (name = "Courses", description = "Catalog management"),
        (name = "AI Matching", description = "Course similarity analysis"),
        (name = "Evaluations", description = "Evaluator decisions"),
        (name = "Admin", description = "User management and analytics"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
