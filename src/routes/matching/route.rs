use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    AnalyzeRequest, AnalyzeResponse, CourseMatchGroup, MatchResponse, MatchResultsResponse,
    TargetCourseSummary,
};
use crate::entities::sea_orm_active_enums::SubmissionStatus;
use crate::entities::submission;
use crate::extractor::AuthClaims;
use crate::matching::run_matching_analysis;
use crate::repositories::{
    CourseMatchRepository, StatusWrite, SubmissionRepository, TargetCourseRepository,
};
use crate::utils::jwt::{TokenClaims, UserRole};
use crate::workflow::TransitionError;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/match/analyze", post(analyze_submission))
        .route("/api/match/results/{submission_id}", get(get_match_results))
}

/// Students may only touch their own submissions; evaluators and system
/// admins may trigger and read any analysis.
fn check_submission_access(
    claims: &TokenClaims,
    submission: &submission::Model,
) -> Result<(), (StatusCode, String)> {
    if claims.role == UserRole::Student && claims.user_id != submission.student_id.to_string() {
        return Err((
            StatusCode::FORBIDDEN,
            "You can only access your own submissions".to_string(),
        ));
    }
    Ok(())
}

/// Kick off AI matching for a submission. The analysis itself runs as a
/// detached task; clients poll the submission status afterwards. Invoking
/// analyze while a run is already in flight is a no-op, so a double click
/// cannot produce duplicate matches.
#[utoipa::path(
    post,
    path = "/api/match/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 202, description = "Analysis started (or already running)", body = AnalyzeResponse),
        (status = 400, description = "No transfer courses, or submission not ready for analysis"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "AI Matching"
)]
pub async fn analyze_submission(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<AnalyzeResponse>), (StatusCode, String)> {
    let submission_repo = SubmissionRepository::new();

    let submission = submission_repo
        .find_by_id(payload.submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Submission not found".to_string()))?;

    check_submission_access(&auth_claims, &submission)?;

    let course_count = submission_repo
        .count_transfer_courses(payload.submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?;
    if course_count == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "No transfer courses to analyze".to_string(),
        ));
    }

    // pending -> processing, guarded; a submission already processing stays
    // untouched and no second task is dispatched
    let write = submission_repo
        .set_status(payload.submission_id, SubmissionStatus::Processing)
        .await
        .map_err(|error| match error.downcast_ref::<TransitionError>() {
            Some(transition) => (StatusCode::BAD_REQUEST, transition.to_string()),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to start analysis: {}", error),
            ),
        })?;

    let message = match write {
        StatusWrite::Applied(_) => {
            tokio::spawn(run_matching_analysis(payload.submission_id));
            "Analysis started"
        }
        StatusWrite::Noop(_) => "Analysis already in progress",
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(AnalyzeResponse {
            message: message.to_string(),
            submission_id: payload.submission_id,
            status: SubmissionStatus::Processing,
        }),
    ))
}

/// Ranked candidates per transfer course, assembled for display
pub async fn collect_match_results(
    submission_id: Uuid,
) -> anyhow::Result<Vec<CourseMatchGroup>> {
    let submission_repo = SubmissionRepository::new();
    let match_repo = CourseMatchRepository::new();
    let course_repo = TargetCourseRepository::new();

    let transfer_courses = submission_repo.find_transfer_courses(submission_id).await?;

    let mut results = Vec::with_capacity(transfer_courses.len());
    for transfer_course in transfer_courses {
        let matches = match_repo
            .find_by_transfer_course(transfer_course.transfer_course_id)
            .await?;

        let mut match_responses = Vec::with_capacity(matches.len());
        for course_match in matches {
            let target_course = course_repo
                .find_by_id(course_match.target_course_id)
                .await?
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

        results.push(CourseMatchGroup {
            transfer_course: transfer_course.into(),
            matches: match_responses,
        });
    }

    Ok(results)
}

/// Matching results for a submission, grouped per transfer course
#[utoipa::path(
    get,
    path = "/api/match/results/{submission_id}",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Match results", body = MatchResultsResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "AI Matching"
)]
pub async fn get_match_results(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
) -> Result<(StatusCode, Json<MatchResultsResponse>), (StatusCode, String)> {
    let submission = SubmissionRepository::new()
        .find_by_id(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Submission not found".to_string()))?;

    check_submission_access(&auth_claims, &submission)?;

    let results = collect_match_results(submission_id).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to collect match results: {}", e),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(MatchResultsResponse {
            submission_id,
            status: submission.status,
            results,
        }),
    ))
}
