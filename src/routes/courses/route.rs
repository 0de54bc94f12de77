use axum::{
    Json, Router,
    extract::{Multipart, Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    CatalogImportParams, CatalogImportResponse, CatalogParseOutcome, CourseResponse,
    CreateCourseRequest, DeleteCourseResponse, UpdateCourseRequest, parse_catalog_csv,
    parse_catalog_xlsx,
};
use crate::entities::sea_orm_active_enums::CourseLevel;
use crate::extractor::AuthClaims;
use crate::middleware::permission::require_roles;
use crate::repositories::{TargetCourseRepository, TargetCourseUpdate, UniversityRepository};
use crate::utils::jwt::{TokenClaims, UserRole};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/courses", post(create_course))
        .route("/api/courses/bulk", post(import_catalog))
        .route(
            "/api/courses/{course_id}",
            get(get_course).put(update_course).delete(delete_course),
        )
}

/// Catalog writers other than the system admin stay inside their own
/// university.
fn check_university_scope(
    claims: &TokenClaims,
    university_id: Uuid,
) -> Result<(), (StatusCode, String)> {
    match claims.role {
        UserRole::SystemAdmin => Ok(()),
        UserRole::Professor | UserRole::UniversityAdmin => {
            if claims.university_id == Some(university_id) {
                Ok(())
            } else {
                Err((
                    StatusCode::FORBIDDEN,
                    "You can only manage courses of your own university".to_string(),
                ))
            }
        }
        UserRole::Student | UserRole::Evaluator => Err((
            StatusCode::FORBIDDEN,
            "You do not have permission to manage courses".to_string(),
        )),
    }
}

/// Add a single course to a university's catalog
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Duplicate course code"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "University not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), (StatusCode, String)> {
    require_roles(
        &auth_claims,
        &[
            UserRole::Professor,
            UserRole::UniversityAdmin,
            UserRole::SystemAdmin,
        ],
    )?;
    check_university_scope(&auth_claims, payload.university_id)?;

    UniversityRepository::new()
        .find_by_id(payload.university_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "University not found".to_string()))?;

    let course_repo = TargetCourseRepository::new();

    let existing = course_repo
        .find_by_code(payload.university_id, &payload.course_code)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?;
    if existing.is_some() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Course with code {} already exists", payload.course_code),
        ));
    }

    let course = course_repo
        .create(
            Uuid::new_v4(),
            payload.university_id,
            payload.course_code,
            payload.course_name,
            payload.department,
            payload.credits,
            payload.course_level.unwrap_or(CourseLevel::Undergraduate),
            payload.description,
            payload.learning_outcomes,
            payload.prerequisites,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create course: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

/// Get one active catalog entry
#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course retrieved", body = CourseResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn get_course(
    AuthClaims(_auth_claims): AuthClaims,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CourseResponse>), (StatusCode, String)> {
    let course = TargetCourseRepository::new()
        .find_by_id(course_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .filter(|course| course.is_active)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Course not found".to_string()))?;

    Ok((StatusCode::OK, Json(course.into())))
}

/// Update a catalog entry
#[utoipa::path(
    put,
    path = "/api/courses/{course_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    AuthClaims(auth_claims): AuthClaims,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), (StatusCode, String)> {
    require_roles(
        &auth_claims,
        &[
            UserRole::Professor,
            UserRole::UniversityAdmin,
            UserRole::SystemAdmin,
        ],
    )?;

    let course_repo = TargetCourseRepository::new();

    let course = course_repo
        .find_by_id(course_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Course not found".to_string()))?;

    check_university_scope(&auth_claims, course.university_id)?;

    let updates = TargetCourseUpdate {
        course_code: payload.course_code,
        course_name: payload.course_name,
        department: payload.department,
        credits: payload.credits,
        course_level: payload.course_level,
        description: payload.description,
        learning_outcomes: payload.learning_outcomes,
        prerequisites: payload.prerequisites,
        ..Default::default()
    };

    let updated = course_repo.update(course_id, updates).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to update course: {}", e),
        )
    })?;

    Ok((StatusCode::OK, Json(updated.into())))
}

/// Deactivate a catalog entry; matches and evaluations keep their history
#[utoipa::path(
    delete,
    path = "/api/courses/{course_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course deactivated", body = DeleteCourseResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    AuthClaims(auth_claims): AuthClaims,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<DeleteCourseResponse>), (StatusCode, String)> {
    require_roles(
        &auth_claims,
        &[UserRole::UniversityAdmin, UserRole::SystemAdmin],
    )?;

    let course_repo = TargetCourseRepository::new();

    let course = course_repo
        .find_by_id(course_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Course not found".to_string()))?;

    check_university_scope(&auth_claims, course.university_id)?;

    course_repo.deactivate(course_id).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to deactivate course: {}", e),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(DeleteCourseResponse {
            message: "Course deactivated successfully".to_string(),
        }),
    ))
}

/// Bulk catalog import from a CSV or XLSX upload. Partial success is the
/// designed behavior: malformed rows are reported per row number while the
/// rest of the batch proceeds.
#[utoipa::path(
    post,
    path = "/api/courses/bulk",
    params(CatalogImportParams),
    responses(
        (status = 200, description = "Import completed", body = CatalogImportResponse),
        (status = 400, description = "Unreadable file or missing university"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "University not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn import_catalog(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<CatalogImportParams>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CatalogImportResponse>), (StatusCode, String)> {
    require_roles(
        &auth_claims,
        &[UserRole::UniversityAdmin, UserRole::SystemAdmin],
    )?;

    let university_id = params
        .university_id
        .or(auth_claims.university_id)
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "Please specify a university_id".to_string(),
            )
        })?;
    check_university_scope(&auth_claims, university_id)?;

    UniversityRepository::new()
        .find_by_id(university_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "University not found".to_string()))?;

    // Pull the uploaded file out of the multipart body
    let mut file: Option<(String, bytes::Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid multipart body: {}", e),
        )
    })? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("catalog.csv").to_string();
            let data = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read uploaded file: {}", e),
                )
            })?;
            file = Some((filename, data));
        }
    }

    let (filename, data) =
        file.ok_or_else(|| (StatusCode::BAD_REQUEST, "No file uploaded".to_string()))?;

    let lowercase_name = filename.to_lowercase();
    let outcome: CatalogParseOutcome = if lowercase_name.ends_with(".csv") {
        parse_catalog_csv(&data).map_err(|e| (StatusCode::BAD_REQUEST, e))?
    } else if lowercase_name.ends_with(".xlsx") || lowercase_name.ends_with(".xls") {
        parse_catalog_xlsx(&data).map_err(|e| (StatusCode::BAD_REQUEST, e))?
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Only CSV and Excel files are supported".to_string(),
        ));
    };

    let course_repo = TargetCourseRepository::new();
    let mut created = 0u64;
    let mut updated = 0u64;
    let mut skipped = 0u64;
    let mut errors = outcome.errors;

    for (row_number, row) in outcome.rows {
        let existing = match course_repo.find_by_code(university_id, &row.course_code).await {
            Ok(existing) => existing,
            Err(error) => {
                errors.push(format!("Row {}: {}", row_number, error));
                continue;
            }
        };

        match existing {
            Some(course) => {
                if !params.replace {
                    skipped += 1;
                    continue;
                }
                let result = course_repo
                    .update(
                        course.course_id,
                        TargetCourseUpdate {
                            course_name: Some(row.course_name),
                            department: row.department,
                            credits: Some(row.credits),
                            course_level: Some(row.course_level),
                            description: row.description,
                            learning_outcomes: row.learning_outcomes,
                            prerequisites: row.prerequisites,
                            ..Default::default()
                        },
                    )
                    .await;
                match result {
                    Ok(_) => updated += 1,
                    Err(error) => errors.push(format!("Row {}: {}", row_number, error)),
                }
            }
            None => {
                let result = course_repo
                    .create(
                        Uuid::new_v4(),
                        university_id,
                        row.course_code,
                        row.course_name,
                        row.department,
                        row.credits,
                        row.course_level,
                        row.description,
                        row.learning_outcomes,
                        row.prerequisites,
                    )
                    .await;
                match result {
                    Ok(_) => created += 1,
                    Err(error) => errors.push(format!("Row {}: {}", row_number, error)),
                }
            }
        }
    }

    Ok((
        StatusCode::OK,
        Json(CatalogImportResponse {
            created,
            updated,
            skipped,
            errors,
        }),
    ))
}
