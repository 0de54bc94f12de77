use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    LoginRequest, LogoutResponse, RegisterRequest, TokenResponse, UpdateMeRequest, UserResponse,
};
use crate::config::{APP_CONFIG, JWT_EXPIRED_TIME};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::extractor::AuthClaims;
use crate::repositories::{UserRepository, user_repository::UserUpdate};
use crate::utils::jwt::{JwtManager, UserRole};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(get_me).put(update_me))
}

fn issue_token(user: &crate::entities::user::Model) -> Result<String, (StatusCode, String)> {
    let jwt_manager = JwtManager::new(APP_CONFIG.jwt_secret.clone());
    let role: UserRole = user.role.into();

    jwt_manager
        .create_jwt(
            &user.user_id.to_string(),
            &format!("{} {}", user.first_name, user.last_name),
            role,
            user.university_id,
            JWT_EXPIRED_TIME,
        )
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create token: {}", e),
            )
        })
}

/// Register a new account, defaulting to the student role
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn register(
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), (StatusCode, String)> {
    let user_repo = UserRepository::new();

    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err((
            StatusCode::BAD_REQUEST,
            "A valid email is required".to_string(),
        ));
    }
    if payload.password.len() < 6 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters".to_string(),
        ));
    }

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

    let user = user_repo
        .create(
            Uuid::new_v4(),
            payload.email,
            hashed_password,
            payload.first_name,
            payload.last_name,
            payload.role.unwrap_or(RoleEnum::Student),
            payload.university_id,
            false,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create user: {}", e),
            )
        })?;

    let token = issue_token(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: JWT_EXPIRED_TIME,
            user: user.into(),
        }),
    ))
}

/// Login endpoint - returns JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn login(
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), (StatusCode, String)> {
    let user_repo = UserRepository::new();

    let user = user_repo
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            )
        })?;

    let password_valid = bcrypt::verify(&payload.password, &user.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Password verification error: {}", e),
        )
    })?;

    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err((
            StatusCode::FORBIDDEN,
            "User account is disabled".to_string(),
        ));
    }

    let token = issue_token(&user)?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: JWT_EXPIRED_TIME,
            user: user.into(),
        }),
    ))
}

/// Logout endpoint - tokens are stateless, the client discards its copy
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = LogoutResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn logout(
    AuthClaims(_auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<LogoutResponse>), (StatusCode, String)> {
    Ok((
        StatusCode::OK,
        Json(LogoutResponse {
            message: "Successfully logged out".to_string(),
        }),
    ))
}

/// Current principal's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn get_me(
    AuthClaims(auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    let user_id = Uuid::parse_str(&auth_claims.user_id).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Invalid user_id: {}", e),
        )
    })?;

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

/// Update the current principal's profile
#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn update_me(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    let user_id = Uuid::parse_str(&auth_claims.user_id).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Invalid user_id: {}", e),
        )
    })?;

    let update = UserUpdate {
        first_name: payload.first_name,
        last_name: payload.last_name,
        university_id: payload.university_id.map(Some),
        ..Default::default()
    };

    let user = UserRepository::new()
        .update(user_id, update)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to update profile: {}", e),
            )
        })?;

    Ok((StatusCode::OK, Json(user.into())))
}
