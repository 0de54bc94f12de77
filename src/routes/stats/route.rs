use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};

use super::dto::{
    AdminSubmissionListResponse, AdminSubmissionQueryParams, AdminSubmissionRow,
    AnalyticsResponse, ContentCounts, EvaluationOutcomeCounts, SubmissionPipelineCounts,
    UserCounts,
};
use crate::entities::sea_orm_active_enums::{EvaluationDecision, RoleEnum, SubmissionStatus};
use crate::extractor::AuthClaims;
use crate::middleware::permission::require_roles;
use crate::repositories::{
    EvaluationRepository, SubmissionRepository, TargetCourseRepository, UniversityRepository,
    UserRepository,
};
use crate::utils::jwt::UserRole;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/admin/analytics", get(get_analytics))
        .route("/api/admin/submissions", get(list_all_submissions))
}

const ADMIN_ROLES: [UserRole; 2] = [UserRole::SystemAdmin, UserRole::UniversityAdmin];

/// Platform-wide analytics: user, catalog, submission and decision counts
#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    responses(
        (status = 200, description = "Analytics", body = AnalyticsResponse),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_analytics(
    AuthClaims(auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<AnalyticsResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &ADMIN_ROLES)?;

    let user_repo = UserRepository::new();
    let submission_repo = SubmissionRepository::new();
    let evaluation_repo = EvaluationRepository::new();

    let map_err = |e: anyhow::Error| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to build analytics: {}", e),
        )
    };

    let total_users = user_repo.count_all().await.map_err(map_err)?;
    let students = user_repo
        .count_by_role(RoleEnum::Student)
        .await
        .map_err(map_err)?;
    let professors = user_repo
        .count_by_role(RoleEnum::Professor)
        .await
        .map_err(map_err)?;
    let evaluators = user_repo
        .count_by_role(RoleEnum::Evaluator)
        .await
        .map_err(map_err)?;
    let university_admins = user_repo
        .count_by_role(RoleEnum::UniversityAdmin)
        .await
        .map_err(map_err)?;
    let system_admins = user_repo
        .count_by_role(RoleEnum::SystemAdmin)
        .await
        .map_err(map_err)?;

    let universities = UniversityRepository::new()
        .count_active()
        .await
        .map_err(map_err)?;
    let courses = TargetCourseRepository::new()
        .count_active()
        .await
        .map_err(map_err)?;

    let total_submissions = submission_repo.count_all().await.map_err(map_err)?;
    let in_flight = submission_repo
        .count_with_status(&[
            SubmissionStatus::Pending,
            SubmissionStatus::Processing,
            SubmissionStatus::InReview,
        ])
        .await
        .map_err(map_err)?;
    let completed = submission_repo
        .count_with_status(&[SubmissionStatus::Completed])
        .await
        .map_err(map_err)?;
    let rejected = submission_repo
        .count_with_status(&[SubmissionStatus::Rejected])
        .await
        .map_err(map_err)?;

    let total_evaluations = evaluation_repo.count_all().await.map_err(map_err)?;
    let approved = evaluation_repo
        .count_with_decision(EvaluationDecision::Approved)
        .await
        .map_err(map_err)?;
    let denied = evaluation_repo
        .count_with_decision(EvaluationDecision::Rejected)
        .await
        .map_err(map_err)?;

    let approval_rate = if total_evaluations > 0 {
        (approved as f64 / total_evaluations as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    Ok((
        StatusCode::OK,
        Json(AnalyticsResponse {
            users: UserCounts {
                total: total_users,
                students,
                professors,
                evaluators,
                admins: university_admins + system_admins,
            },
            content: ContentCounts {
                universities,
                courses,
            },
            submissions: SubmissionPipelineCounts {
                total: total_submissions,
                in_flight,
                completed,
                rejected,
            },
            evaluations: EvaluationOutcomeCounts {
                total: total_evaluations,
                approved,
                rejected: denied,
                approval_rate,
            },
        }),
    ))
}

/// All submissions, paginated. University admins are scoped to their own
/// university's intake.
#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    params(AdminSubmissionQueryParams),
    responses(
        (status = 200, description = "Submissions", body = AdminSubmissionListResponse),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_submissions(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<AdminSubmissionQueryParams>,
) -> Result<(StatusCode, Json<AdminSubmissionListResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &ADMIN_ROLES)?;

    let university_filter = if auth_claims.role == UserRole::UniversityAdmin {
        auth_claims.university_id
    } else {
        None
    };

    let page = if params.page == 0 { 1 } else { params.page };
    let page_size = if params.page_size == 0 || params.page_size > 100 {
        20
    } else {
        params.page_size
    };

    let submission_repo = SubmissionRepository::new();
    let user_repo = UserRepository::new();
    let university_repo = UniversityRepository::new();

    let (submissions, total) = submission_repo
        .find_all_with_pagination(
            params.status,
            university_filter,
            (page - 1) * page_size,
            page_size,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get submissions: {}", e),
            )
        })?;

    let mut rows = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let student = user_repo
            .find_by_id(submission.student_id)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                )
            })?;
        let university = university_repo
            .find_by_id(submission.target_university_id)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                )
            })?;
        let courses_count = submission_repo
            .count_transfer_courses(submission.submission_id)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                )
            })?;

        rows.push(AdminSubmissionRow {
            submission_id: submission.submission_id,
            student_email: student.map(|s| s.email),
            target_university: university.map(|u| u.name),
            status: submission.status,
            created_at: submission.created_at,
            courses_count,
        });
    }

    Ok((
        StatusCode::OK,
        Json(AdminSubmissionListResponse {
            submissions: rows,
            total,
            page,
            page_size,
        }),
    ))
}
