use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    CreateUserRequest, DeleteUserResponse, UpdateUserRequest, UserListResponse, UserQueryParams,
};
use crate::extractor::AuthClaims;
use crate::middleware::permission::require_roles;
use crate::repositories::{UserRepository, user_repository::UserUpdate};
use crate::routes::auth::dto::UserResponse;
use crate::utils::jwt::UserRole;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/admin/users", post(create_user).get(get_all_users))
        .route(
            "/api/admin/users/{user_id}",
            get(get_user_by_id)
                .put(update_user)
                .delete(delete_user),
        )
}

/// Create a user with any role (System admin only)
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Forbidden - System admin only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_user(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &[UserRole::SystemAdmin])?;

    let user_repo = UserRepository::new();

    let existing = user_repo.find_by_email(&payload.email).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Database error: {}", e),
        )
    })?;
    if existing.is_some() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Email already registered".to_string(),
        ));
    }

    let hashed_password = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to hash password: {}", e),
        )
    })?;

    // Admin-created users are pre-verified
    let user = user_repo
        .create(
            Uuid::new_v4(),
            payload.email,
            hashed_password,
            payload.first_name,
            payload.last_name,
            payload.role,
            payload.university_id,
            true,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create user: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List users with optional role filter (System admin only)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserQueryParams),
    responses(
        (status = 200, description = "Users retrieved", body = UserListResponse),
        (status = 403, description = "Forbidden - System admin only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_all_users(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<UserQueryParams>,
) -> Result<(StatusCode, Json<UserListResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &[UserRole::SystemAdmin])?;

    let page = if params.page == 0 { 1 } else { params.page };
    let page_size = if params.page_size == 0 || params.page_size > 100 {
        20
    } else {
        params.page_size
    };

    let (users, total) = UserRepository::new()
        .find_all_with_pagination(page, page_size, params.role)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get users: {}", e),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(UserListResponse {
            users: users.into_iter().map(UserResponse::from).collect(),
            total,
            page,
            page_size,
        }),
    ))
}

/// Get one user (System admin only)
#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User retrieved", body = UserResponse),
        (status = 403, description = "Forbidden - System admin only"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_user_by_id(
    AuthClaims(auth_claims): AuthClaims,
    Path(user_id): Path<Uuid>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &[UserRole::SystemAdmin])?;

    let user = UserRepository::new()
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "User not found".to_string()))?;

    Ok((StatusCode::OK, Json(user.into())))
}

/// Update a user, including their role (System admin only)
#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Forbidden - System admin only"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_user(
    AuthClaims(auth_claims): AuthClaims,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &[UserRole::SystemAdmin])?;

    let user_repo = UserRepository::new();

    user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "User not found".to_string()))?;

    let update = UserUpdate {
        first_name: payload.first_name,
        last_name: payload.last_name,
        role: payload.role,
        university_id: payload.university_id.map(Some),
        is_verified: payload.is_verified,
        is_active: payload.is_active,
        ..Default::default()
    };

    let user = user_repo.update(user_id, update).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to update user: {}", e),
        )
    })?;

    Ok((StatusCode::OK, Json(user.into())))
}

/// Deactivate a user; accounts are never hard-deleted (System admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deactivated", body = DeleteUserResponse),
        (status = 400, description = "Cannot delete own account"),
        (status = 403, description = "Forbidden - System admin only"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_user(
    AuthClaims(auth_claims): AuthClaims,
    Path(user_id): Path<Uuid>,
) -> Result<(StatusCode, Json<DeleteUserResponse>), (StatusCode, String)> {
    require_roles(&auth_claims, &[UserRole::SystemAdmin])?;

    if auth_claims.user_id == user_id.to_string() {
        return Err((
            StatusCode::BAD_REQUEST,
            "You cannot delete your own account".to_string(),
        ));
    }

    let user_repo = UserRepository::new();

    user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "User not found".to_string()))?;

    user_repo.deactivate(user_id).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to deactivate user: {}", e),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(DeleteUserResponse {
            message: "User deactivated successfully".to_string(),
        }),
    ))
}
