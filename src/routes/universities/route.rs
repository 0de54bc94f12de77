use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    CatalogQueryParams, CreateUniversityRequest, ListQueryParams, UniversityResponse,
};
use crate::extractor::AuthClaims;
use crate::middleware::permission::require_roles;
use crate::repositories::{TargetCourseRepository, UniversityRepository};
use crate::routes::courses::dto::CourseResponse;
use crate::utils::jwt::UserRole;

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/universities",
            get(list_universities).post(create_university),
        )
        .route("/api/universities/{university_id}", get(get_university))
        .route(
            "/api/universities/{university_id}/courses",
            get(get_university_courses),
        )
}

/// List active universities (public)
#[utoipa::path(
    get,
    path = "/api/universities",
    params(ListQueryParams),
    responses(
        (status = 200, description = "Universities retrieved", body = [UniversityResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Universities"
)]
pub async fn list_universities(
    Query(params): Query<ListQueryParams>,
) -> Result<(StatusCode, Json<Vec<UniversityResponse>>), (StatusCode, String)> {
    let limit = if params.limit == 0 || params.limit > 100 {
        100
    } else {
        params.limit
    };

    let universities = UniversityRepository::new()
        .find_active(params.skip, limit)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get universities: {}", e),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(
            universities
                .into_iter()
                .map(UniversityResponse::from)
                .collect(),
        ),
    ))
}

/// Get one active university (public)
#[utoipa::path(
    get,
    path = "/api/universities/{university_id}",
    params(
        ("university_id" = Uuid, Path, description = "University ID")
    ),
    responses(
        (status = 200, description = "University retrieved", body = UniversityResponse),
        (status = 404, description = "University not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Universities"
)]
pub async fn get_university(
    Path(university_id): Path<Uuid>,
) -> Result<(StatusCode, Json<UniversityResponse>), (StatusCode, String)> {
    let university = UniversityRepository::new()
        .find_by_id(university_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .filter(|university| university.is_active)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "University not found".to_string()))?;

    Ok((StatusCode::OK, Json(university.into())))
}

/// Active catalog of one university (public)
#[utoipa::path(
    get,
    path = "/api/universities/{university_id}/courses",
    params(
        ("university_id" = Uuid, Path, description = "University ID"),
        CatalogQueryParams
    ),
    responses(
        (status = 200, description = "Courses retrieved", body = [CourseResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Universities"
)]
pub async fn get_university_courses(
    Path(university_id): Path<Uuid>,
    Query(params): Query<CatalogQueryParams>,
) -> Result<(StatusCode, Json<Vec<CourseResponse>>), (StatusCode, String)> {
    let limit = if params.limit == 0 || params.limit > 100 {
        100
    } else {
        params.limit
    };

    let courses = TargetCourseRepository::new()
        .find_active_by_university(university_id, params.department, params.skip, limit)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get courses: {}", e),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(courses.into_iter().map(CourseResponse::from).collect()),
    ))
}

/// Create a university (System admin only)
#[utoipa::path(
    post,
    path = "/api/universities",
    request_body = CreateUniversityRequest,
    responses(
        (status = 201, description = "University created", body = UniversityResponse),
        (status = 400, description = "Duplicate domain"),
        (status = 403, description = "Forbidden - System admin only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Universities"
)]
pub async fn create_university(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreateUniversityRequest>,
) -> Result<(StatusCode, Json<UniversityResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &[UserRole::SystemAdmin])?;

    let university_repo = UniversityRepository::new();

    let existing = university_repo
        .find_by_domain(&payload.domain)
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
            "University with this domain already exists".to_string(),
        ));
    }

    let university = university_repo
        .create(
            Uuid::new_v4(),
            payload.name,
            payload.domain,
            payload.description,
            payload.location,
            payload.website,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create university: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(university.into())))
}
