use axum::{
    Json, Router,
    extract::{Multipart, Path},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    AddTransferCourseRequest, CreateSubmissionRequest, SubmissionResponse,
    SubmissionStatusResponse, SubmitForReviewResponse, TransferCourseResponse, UploadResponse,
};
use crate::config::APP_CONFIG;
use crate::entities::sea_orm_active_enums::SubmissionStatus;
use crate::entities::submission;
use crate::extractor::AuthClaims;
use crate::repositories::{
    EvaluationRepository, NewTransferCourse, StatusWrite, SubmissionRepository,
    UniversityRepository,
};
use crate::routes::matching::dto::MatchResultsResponse;
use crate::routes::matching::route::collect_match_results;
use crate::utils::jwt::TokenClaims;
use crate::utils::upload::save_upload;
use crate::workflow::TransitionError;

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/student/submissions",
            post(create_submission).get(get_submissions),
        )
        .route(
            "/api/student/submissions/{submission_id}",
            get(get_submission).delete(delete_submission),
        )
        .route(
            "/api/student/submissions/{submission_id}/status",
            get(get_submission_status),
        )
        .route(
            "/api/student/submissions/{submission_id}/upload-transcript",
            post(upload_transcript),
        )
        .route(
            "/api/student/submissions/{submission_id}/courses",
            post(add_transfer_course),
        )
        .route(
            "/api/student/submissions/{submission_id}/courses/{course_id}/upload-syllabus",
            post(upload_syllabus),
        )
        .route(
            "/api/student/submissions/{submission_id}/submit",
            post(submit_for_review),
        )
        .route(
            "/api/student/submissions/{submission_id}/matches",
            get(get_submission_matches),
        )
}

fn caller_id(claims: &TokenClaims) -> Result<Uuid, (StatusCode, String)> {
    Uuid::parse_str(&claims.user_id).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Invalid user_id: {}", e),
        )
    })
}

/// Loads a submission owned by the caller, 404 otherwise (foreign
/// submissions are indistinguishable from missing ones on purpose)
async fn find_own_submission(
    claims: &TokenClaims,
    submission_id: Uuid,
) -> Result<submission::Model, (StatusCode, String)> {
    let student_id = caller_id(claims)?;

    SubmissionRepository::new()
        .find_by_id(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .filter(|submission| submission.student_id == student_id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Submission not found".to_string()))
}

async fn read_multipart_file(
    multipart: &mut Multipart,
) -> Result<(String, bytes::Bytes), (StatusCode, String)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid multipart body: {}", e),
        )
    })? {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing filename".to_string()))?;
            let data = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read uploaded file: {}", e),
                )
            })?;
            return Ok((filename, data));
        }
    }

    Err((StatusCode::BAD_REQUEST, "No file uploaded".to_string()))
}

/// Start a new transfer credit request in draft
#[utoipa::path(
    post,
    path = "/api/student/submissions",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission created", body = SubmissionResponse),
        (status = 404, description = "Target university not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn create_submission(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), (StatusCode, String)> {
    let student_id = caller_id(&auth_claims)?;

    UniversityRepository::new()
        .find_by_id(payload.target_university_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .filter(|university| university.is_active)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                "Target university not found".to_string(),
            )
        })?;

    let submission = SubmissionRepository::new()
        .create(
            Uuid::new_v4(),
            student_id,
            payload.target_university_id,
            payload.notes,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create submission: {}", e),
            )
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse::from_parts(submission, Vec::new())),
    ))
}

/// All submissions of the current student
#[utoipa::path(
    get,
    path = "/api/student/submissions",
    responses(
        (status = 200, description = "Submissions retrieved", body = [SubmissionResponse]),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn get_submissions(
    AuthClaims(auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<Vec<SubmissionResponse>>), (StatusCode, String)> {
    let student_id = caller_id(&auth_claims)?;
    let submission_repo = SubmissionRepository::new();

    let submissions = submission_repo
        .find_by_student(student_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get submissions: {}", e),
            )
        })?;

    let mut responses = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let courses = submission_repo
            .find_transfer_courses(submission.submission_id)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to get transfer courses: {}", e),
                )
            })?;
        responses.push(SubmissionResponse::from_parts(submission, courses));
    }

    Ok((StatusCode::OK, Json(responses)))
}

/// One submission of the current student, with its courses
#[utoipa::path(
    get,
    path = "/api/student/submissions/{submission_id}",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission retrieved", body = SubmissionResponse),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn get_submission(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmissionResponse>), (StatusCode, String)> {
    let submission = find_own_submission(&auth_claims, submission_id).await?;

    let courses = SubmissionRepository::new()
        .find_transfer_courses(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get transfer courses: {}", e),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(SubmissionResponse::from_parts(submission, courses)),
    ))
}

/// Lifecycle status plus evaluation progress, for polling after analyze
#[utoipa::path(
    get,
    path = "/api/student/submissions/{submission_id}/status",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Status retrieved", body = SubmissionStatusResponse),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn get_submission_status(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmissionStatusResponse>), (StatusCode, String)> {
    let submission = find_own_submission(&auth_claims, submission_id).await?;

    let courses_count = SubmissionRepository::new()
        .count_transfer_courses(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?;

    let evaluated_count = EvaluationRepository::new()
        .find_by_submission(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .iter()
        .filter(|evaluation| evaluation.decision.is_terminal())
        .count() as u64;

    Ok((
        StatusCode::OK,
        Json(SubmissionStatusResponse {
            submission_id,
            status: submission.status,
            courses_count,
            evaluated_count,
        }),
    ))
}

/// Delete a draft submission; cascades to courses, matches and evaluations
#[utoipa::path(
    delete,
    path = "/api/student/submissions/{submission_id}",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 400, description = "Only draft submissions can be deleted"),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn delete_submission(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let submission = find_own_submission(&auth_claims, submission_id).await?;

    if submission.status != SubmissionStatus::Draft {
        return Err((
            StatusCode::BAD_REQUEST,
            "Only draft submissions can be deleted".to_string(),
        ));
    }

    SubmissionRepository::new()
        .delete(submission_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to delete submission: {}", e),
            )
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Attach the transcript PDF. Uploading does not advance the lifecycle;
/// submit-for-review does.
#[utoipa::path(
    post,
    path = "/api/student/submissions/{submission_id}/upload-transcript",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Transcript stored", body = UploadResponse),
        (status = 400, description = "Invalid file"),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn upload_transcript(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), (StatusCode, String)> {
    let submission = find_own_submission(&auth_claims, submission_id).await?;

    let (filename, data) = read_multipart_file(&mut multipart).await?;

    let file_path = save_upload(
        &APP_CONFIG.upload_dir,
        "transcripts",
        submission.student_id,
        &filename,
        &["pdf"],
        data,
    )
    .await
    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    SubmissionRepository::new()
        .set_transcript_path(submission_id, file_path.clone())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to store transcript path: {}", e),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            message: "Transcript uploaded successfully".to_string(),
            file_path,
        }),
    ))
}

/// Add a transfer course while the submission is still editable
#[utoipa::path(
    post,
    path = "/api/student/submissions/{submission_id}/courses",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = AddTransferCourseRequest,
    responses(
        (status = 201, description = "Transfer course added", body = TransferCourseResponse),
        (status = 400, description = "Submission is no longer editable"),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn add_transfer_course(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
    Json(payload): Json<AddTransferCourseRequest>,
) -> Result<(StatusCode, Json<TransferCourseResponse>), (StatusCode, String)> {
    let submission = find_own_submission(&auth_claims, submission_id).await?;

    if !matches!(
        submission.status,
        SubmissionStatus::Draft | SubmissionStatus::Pending
    ) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Courses can only be added before analysis starts".to_string(),
        ));
    }

    if payload.course_name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "course_name cannot be empty".to_string(),
        ));
    }

    let course = SubmissionRepository::new()
        .add_transfer_course(
            Uuid::new_v4(),
            NewTransferCourse {
                submission_id,
                course_code: payload.course_code,
                course_name: payload.course_name,
                credits: payload.credits,
                grade: payload.grade,
                source_university_name: payload.source_university_name,
                description: payload.description,
                learning_outcomes: payload.learning_outcomes,
                additional_notes: payload.additional_notes,
            },
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to add transfer course: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

/// Attach a syllabus to one transfer course
#[utoipa::path(
    post,
    path = "/api/student/submissions/{submission_id}/courses/{course_id}/upload-syllabus",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID"),
        ("course_id" = Uuid, Path, description = "Transfer course ID")
    ),
    responses(
        (status = 200, description = "Syllabus stored", body = UploadResponse),
        (status = 400, description = "Invalid file"),
        (status = 404, description = "Transfer course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn upload_syllabus(
    AuthClaims(auth_claims): AuthClaims,
    Path((submission_id, course_id)): Path<(Uuid, Uuid)>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), (StatusCode, String)> {
    let submission = find_own_submission(&auth_claims, submission_id).await?;
    let submission_repo = SubmissionRepository::new();

    submission_repo
        .find_transfer_course(submission_id, course_id)
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

    let (filename, data) = read_multipart_file(&mut multipart).await?;

    let file_path = save_upload(
        &APP_CONFIG.upload_dir,
        "syllabi",
        submission.student_id,
        &filename,
        &["pdf", "docx"],
        data,
    )
    .await
    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    submission_repo
        .set_syllabus_path(course_id, file_path.clone())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to store syllabus path: {}", e),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            message: "Syllabus uploaded successfully".to_string(),
            file_path,
        }),
    ))
}

/// Finalize course entry: draft -> pending. Requires at least one transfer
/// course; submitting an already-pending submission is a no-op.
#[utoipa::path(
    post,
    path = "/api/student/submissions/{submission_id}/submit",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submitted for review", body = SubmitForReviewResponse),
        (status = 400, description = "No transfer courses, or submission already past review intake"),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn submit_for_review(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmitForReviewResponse>), (StatusCode, String)> {
    find_own_submission(&auth_claims, submission_id).await?;

    let write = SubmissionRepository::new()
        .submit_for_review(submission_id)
        .await
        .map_err(|error| match error.downcast_ref::<TransitionError>() {
            Some(transition) => (StatusCode::BAD_REQUEST, transition.to_string()),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to submit for review: {}", error),
            ),
        })?;

    let submission = match write {
        StatusWrite::Applied(model) | StatusWrite::Noop(model) => model,
    };

    Ok((
        StatusCode::OK,
        Json(SubmitForReviewResponse {
            message: "Submission submitted for review".to_string(),
            status: submission.status,
        }),
    ))
}

/// AI match candidates for every course of an own submission
#[utoipa::path(
    get,
    path = "/api/student/submissions/{submission_id}/matches",
    params(
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Match results", body = MatchResultsResponse),
        (status = 404, description = "Submission not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Student Portal"
)]
pub async fn get_submission_matches(
    AuthClaims(auth_claims): AuthClaims,
    Path(submission_id): Path<Uuid>,
) -> Result<(StatusCode, Json<MatchResultsResponse>), (StatusCode, String)> {
    let submission = find_own_submission(&auth_claims, submission_id).await?;

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
