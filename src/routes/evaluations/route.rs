use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use super::dto::{
    CourseReviewDetail, DecisionRequest, EvaluationCounts, EvaluationResponse, PersonSummary,
    PendingReviewResponse, RejectSubmissionRequest, ReportsSummaryResponse, SubmissionCounts,
    SubmissionDetailResponse, UniversitySummary, UpdateDecisionRequest,
};
use crate::entities::sea_orm_active_enums::{EvaluationDecision, SubmissionStatus};
use crate::entities::target_course;
use crate::extractor::AuthClaims;
use crate::middleware::permission::require_roles;
use crate::repositories::{
    CourseMatchRepository, EvaluationRepository, SubmissionRepository, TargetCourseRepository,
    UniversityRepository, UserRepository,
};
use crate::routes::matching::dto::{MatchResponse, TargetCourseSummary};
use crate::utils::jwt::{TokenClaims, UserRole};
use crate::workflow::{DecisionError, TransitionError, validate_decision};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/evaluations/pending", get(get_pending_reviews))
        .route("/api/evaluations/reports/summary", get(get_reports_summary))
        .route(
            "/api/evaluations/{submission_id}",
            get(get_submission_detail),
        )
        .route(
            "/api/evaluations/{submission_id}/decision",
            post(record_decision),
        )
        .route(
            "/api/evaluations/{submission_id}/reject",
            post(reject_submission),
        )
        .route(
            "/api/evaluations/update-decision/{evaluation_id}",
            put(update_decision),
        )
}

const REVIEWER_ROLES: [UserRole; 2] = [UserRole::Evaluator, UserRole::SystemAdmin];

fn caller_id(claims: &TokenClaims) -> Result<Uuid, (StatusCode, String)> {
    Uuid::parse_str(&claims.user_id).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Invalid user_id: {}", e),
        )
    })
}

fn decision_error_response(error: anyhow::Error) -> (StatusCode, String) {
    if let Some(decision) = error.downcast_ref::<DecisionError>() {
        return (StatusCode::BAD_REQUEST, decision.to_string());
    }
    if let Some(transition) = error.downcast_ref::<TransitionError>() {
        return (StatusCode::BAD_REQUEST, transition.to_string());
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to record decision: {}", error),
    )
}

/// Review queue: submitted work awaiting decisions, newest first. Evaluators
/// affiliated with a university see only its submissions.
#[utoipa::path(
    get,
    path = "/api/evaluations/pending",
    responses(
        (status = 200, description = "Pending reviews", body = [PendingReviewResponse]),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
pub async fn get_pending_reviews(
    AuthClaims(auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<Vec<PendingReviewResponse>>), (StatusCode, String)> {
    require_roles(&auth_claims, &REVIEWER_ROLES)?;

    let university_filter = if auth_claims.role == UserRole::Evaluator {
        auth_claims.university_id
    } else {
        None
    };

    let submission_repo = SubmissionRepository::new();
    let user_repo = UserRepository::new();
    let university_repo = UniversityRepository::new();

    let submissions = submission_repo
        .find_review_queue(university_filter)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get review queue: {}", e),
            )
        })?;

    let mut results = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let student = user_repo.find_by_id(submission.student_id).await.map_err(|e| {
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

        results.push(PendingReviewResponse {
            submission_id: submission.submission_id,
            student_id: submission.student_id,
            student_name: student
                .as_ref()
                .map(|s| format!("{} {}", s.first_name, s.last_name)),
            student_email: student.map(|s| s.email),
            target_university_id: submission.target_university_id,
            target_university_name: university.map(|u| u.name),
            status: submission.status,
            created_at: submission.created_at,
            transfer_courses_count: courses_count,
        });
    }

    Ok((StatusCode::OK, Json(results)))
}

/// Full review view of one submission: student, university, every transfer
/// course with its ranked candidates and current decision
#[utoipa::path(
    get,
    path = "/api/evaluations/{submission_id}",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission detail", body = SubmissionDetailResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
pub async fn get_submission_detail(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmissionDetailResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &REVIEWER_ROLES)?;

    let submission_repo = SubmissionRepository::new();
    let evaluation_repo = EvaluationRepository::new();
    let match_repo = CourseMatchRepository::new();
    let course_repo = TargetCourseRepository::new();

    let submission = submission_repo
        .find_by_id(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Submission not found".to_string()))?;

    let student = UserRepository::new()
        .find_by_id(submission.student_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .map(|s| PersonSummary {
            user_id: s.user_id,
            name: format!("{} {}", s.first_name, s.last_name),
            email: s.email,
        });

    let target_university = UniversityRepository::new()
        .find_by_id(submission.target_university_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .map(|u| UniversitySummary {
            university_id: u.university_id,
            name: u.name,
        });

    let transfer_courses = submission_repo
        .find_transfer_courses(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?;

    let mut course_details = Vec::with_capacity(transfer_courses.len());
    for transfer_course in transfer_courses {
        let matches = match_repo
            .find_by_transfer_course(transfer_course.transfer_course_id)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                )
            })?;

        let mut match_responses = Vec::with_capacity(matches.len());
        for course_match in matches {
            let target_course = course_repo
                .find_by_id(course_match.target_course_id)
                .await
                .map_err(|e| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Database error: {}", e),
                    )
                })?
                .map(TargetCourseSummary::from);

            match_responses.push(MatchResponse {
                match_id: course_match.match_id,
                target_course,
                similarity_score: course_match.similarity_score,
                explanation: course_match.explanation,
                key_similarities: course_match.key_similarities,
                important_differences: course_match.important_differences,
                recommendation: course_match.recommendation,
                rank: course_match.rank,
            });
        }

        let evaluation = evaluation_repo
            .find_by_transfer_course(transfer_course.transfer_course_id)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                )
            })?
            .map(EvaluationResponse::from);

        course_details.push(CourseReviewDetail {
            transfer_course: transfer_course.into(),
            matches: match_responses,
            evaluation,
        });
    }

    Ok((
        StatusCode::OK,
        Json(SubmissionDetailResponse {
            submission_id: submission.submission_id,
            status: submission.status,
            created_at: submission.created_at,
            transcript_file_path: submission.transcript_file_path,
            notes: submission.notes,
            student,
            target_university,
            transfer_courses: course_details,
        }),
    ))
}

async fn resolve_approved_course(
    approved_target_course_id: Option<Uuid>,
) -> Result<Option<target_course::Model>, (StatusCode, String)> {
    match approved_target_course_id {
        None => Ok(None),
        Some(course_id) => {
            let course = TargetCourseRepository::new()
                .find_by_id(course_id)
                .await
                .map_err(|e| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Database error: {}", e),
                    )
                })?
                .ok_or_else(|| {
                    (
                        StatusCode::BAD_REQUEST,
                        "Approved target course not found".to_string(),
                    )
                })?;
            Ok(Some(course))
        }
    }
}

/// Record the decision for one transfer course. Recording a second decision
/// overwrites the first; after every write the submission's aggregate status
/// is recomputed, completing it once all courses carry a terminal decision.
#[utoipa::path(
    post,
    path = "/api/evaluations/{submission_id}/decision",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = EvaluationResponse),
        (status = 400, description = "Invalid decision"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Submission or transfer course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
pub async fn record_decision(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> Result<(StatusCode, Json<EvaluationResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &REVIEWER_ROLES)?;
    let evaluator_id = caller_id(&auth_claims)?;

    let submission_repo = SubmissionRepository::new();

    let submission = submission_repo
        .find_by_id(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Submission not found".to_string()))?;

    submission_repo
        .find_transfer_course(submission_id, payload.transfer_course_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                "Transfer course not found in this submission".to_string(),
            )
        })?;

    let approved_course = resolve_approved_course(payload.approved_target_course_id).await?;

    validate_decision(
        auth_claims.role,
        submission.status,
        submission.target_university_id,
        payload.decision,
        approved_course.as_ref(),
    )
    .map_err(|error| match error {
        DecisionError::NotPermitted => (StatusCode::FORBIDDEN, error.to_string()),
        _ => (StatusCode::BAD_REQUEST, error.to_string()),
    })?;

    let evaluation = EvaluationRepository::new()
        .record_decision(
            submission_id,
            payload.transfer_course_id,
            evaluator_id,
            payload.decision,
            payload.approved_target_course_id,
            payload.notes,
        )
        .await
        .map_err(decision_error_response)?;

    Ok((StatusCode::OK, Json(evaluation.into())))
}

/// Overwrite an existing evaluation by its id
#[utoipa::path(
    put,
    path = "/api/evaluations/update-decision/{evaluation_id}",
    params(
        ("evaluation_id" = Uuid, Path, description = "Evaluation ID")
    ),
    request_body = UpdateDecisionRequest,
    responses(
        (status = 200, description = "Decision updated", body = EvaluationResponse),
        (status = 400, description = "Invalid decision"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Evaluation not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
pub async fn update_decision(
    AuthClaims(auth_claims): AuthClaims,
    Path(evaluation_id): Path<Uuid>,
    Json(payload): Json<UpdateDecisionRequest>,
) -> Result<(StatusCode, Json<EvaluationResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &REVIEWER_ROLES)?;
    let evaluator_id = caller_id(&auth_claims)?;

    let evaluation_repo = EvaluationRepository::new();

    let existing = evaluation_repo
        .find_by_id(evaluation_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Evaluation not found".to_string()))?;

    let submission = SubmissionRepository::new()
        .find_by_id(existing.submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Submission not found".to_string()))?;

    let approved_course = resolve_approved_course(payload.approved_target_course_id).await?;

    validate_decision(
        auth_claims.role,
        submission.status,
        submission.target_university_id,
        payload.decision,
        approved_course.as_ref(),
    )
    .map_err(|error| match error {
        DecisionError::NotPermitted => (StatusCode::FORBIDDEN, error.to_string()),
        _ => (StatusCode::BAD_REQUEST, error.to_string()),
    })?;

    let evaluation = evaluation_repo
        .record_decision(
            existing.submission_id,
            existing.transfer_course_id,
            evaluator_id,
            payload.decision,
            payload.approved_target_course_id,
            payload.notes,
        )
        .await
        .map_err(decision_error_response)?;

    Ok((StatusCode::OK, Json(evaluation.into())))
}

/// Reject the submission as a whole. Distinct from per-course rejections:
/// this marks the request itself invalid.
#[utoipa::path(
    post,
    path = "/api/evaluations/{submission_id}/reject",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = RejectSubmissionRequest,
    responses(
        (status = 200, description = "Submission rejected"),
        (status = 400, description = "Submission cannot be rejected from its current status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
pub async fn reject_submission(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
    Json(payload): Json<RejectSubmissionRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, String)> {
    require_roles(&auth_claims, &REVIEWER_ROLES)?;

    SubmissionRepository::new()
        .find_by_id(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Submission not found".to_string()))?;

    let submission = SubmissionRepository::new()
        .reject(submission_id, payload.notes)
        .await
        .map_err(|error| match error.downcast_ref::<TransitionError>() {
            Some(transition) => (StatusCode::BAD_REQUEST, transition.to_string()),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to reject submission: {}", error),
            ),
        })?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Submission rejected",
            "submission_id": submission.submission_id,
            "status": submission.status,
        })),
    ))
}

/// Aggregate evaluation workload and outcome counts
#[utoipa::path(
    get,
    path = "/api/evaluations/reports/summary",
    responses(
        (status = 200, description = "Summary report", body = ReportsSummaryResponse),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
pub async fn get_reports_summary(
    AuthClaims(auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<ReportsSummaryResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &REVIEWER_ROLES)?;

    let submission_repo = SubmissionRepository::new();
    let evaluation_repo = EvaluationRepository::new();

    let map_err = |e: anyhow::Error| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to build report: {}", e),
        )
    };

    let total_submissions = submission_repo.count_all().await.map_err(map_err)?;
    let pending_submissions = submission_repo
        .count_with_status(&[SubmissionStatus::Pending, SubmissionStatus::InReview])
        .await
        .map_err(map_err)?;
    let completed_submissions = submission_repo
        .count_with_status(&[SubmissionStatus::Completed])
        .await
        .map_err(map_err)?;

    let total_evaluations = evaluation_repo.count_all().await.map_err(map_err)?;
    let approved = evaluation_repo
        .count_with_decision(EvaluationDecision::Approved)
        .await
        .map_err(map_err)?;
    let rejected = evaluation_repo
        .count_with_decision(EvaluationDecision::Rejected)
        .await
        .map_err(map_err)?;
    let needs_info = evaluation_repo
        .count_with_decision(EvaluationDecision::NeedsInfo)
        .await
        .map_err(map_err)?;

    let approval_rate = if total_evaluations > 0 {
        (approved as f64 / total_evaluations as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    Ok((
        StatusCode::OK,
        Json(ReportsSummaryResponse {
            submissions: SubmissionCounts {
                total: total_submissions,
                pending: pending_submissions,
                completed: completed_submissions,
            },
            evaluations: EvaluationCounts {
                total: total_evaluations,
                approved,
                rejected,
                needs_info,
                approval_rate,
            },
        }),
    ))
}
