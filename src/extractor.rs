use axum::extract::FromRequestParts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use http::{StatusCode, request::Parts};
use uuid::Uuid;

use crate::config::APP_CONFIG;
use crate::repositories::UserRepository;
use crate::utils::jwt::{JwtManager, TokenClaims};

/// Bearer-token principal. The role is re-derived from the users table on
/// every request, so a role change or deactivation by an admin takes effect
/// mid-session instead of riding out the token's lifetime.
pub struct AuthClaims(pub TokenClaims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    (
                        StatusCode::UNAUTHORIZED,
                        "Missing or invalid Authorization header".to_string(),
                    )
                })?;

        let jwt_manager = JwtManager::new(APP_CONFIG.jwt_secret.clone());
        let mut claims = jwt_manager.verify_jwt(bearer.token()).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            )
        })?;

        let user_id = Uuid::parse_str(&claims.user_id).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid token subject".to_string(),
            )
        })?;

        let user = UserRepository::new()
            .find_by_id(user_id)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to load user: {}", e),
                )
            })?
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    "User no longer exists".to_string(),
                )
            })?;

        if !user.is_active {
            return Err((
                StatusCode::UNAUTHORIZED,
                "User account is disabled".to_string(),
            ));
        }

        claims.role = user.role.into();
        claims.university_id = user.university_id;
        claims.full_name = format!("{} {}", user.first_name, user.last_name);

        Ok(AuthClaims(claims))
    }
}
