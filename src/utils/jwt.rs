use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::sea_orm_active_enums::RoleEnum;

/// Role carried in token claims. Closed set; handlers match exhaustively
/// instead of comparing role strings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Professor,
    UniversityAdmin,
    Evaluator,
    SystemAdmin,
}

impl From<RoleEnum> for UserRole {
    fn from(role: RoleEnum) -> Self {
        match role {
            RoleEnum::Student => UserRole::Student,
            RoleEnum::Professor => UserRole::Professor,
            RoleEnum::UniversityAdmin => UserRole::UniversityAdmin,
            RoleEnum::Evaluator => UserRole::Evaluator,
            RoleEnum::SystemAdmin => UserRole::SystemAdmin,
        }
    }
}

impl From<UserRole> for RoleEnum {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Student => RoleEnum::Student,
            UserRole::Professor => RoleEnum::Professor,
            UserRole::UniversityAdmin => RoleEnum::UniversityAdmin,
            UserRole::Evaluator => RoleEnum::Evaluator,
            UserRole::SystemAdmin => RoleEnum::SystemAdmin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: String,
    pub full_name: String,
    pub role: UserRole,
    /// Affiliation used to scope evaluators, professors and university admins
    pub university_id: Option<uuid::Uuid>,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtManager {
    secret: String,
}

impl JwtManager {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn create_jwt(
        &self,
        user_id: &str,
        full_name: &str,
        role: UserRole,
        university_id: Option<uuid::Uuid>,
        ttl_seconds: i64,
    ) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            full_name: full_name.to_string(),
            role,
            university_id,
            iat: now,
            exp: now + ttl_seconds,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn verify_jwt(&self, token: &str) -> Result<TokenClaims> {
        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_claims() {
        let manager = JwtManager::new("test-secret".to_string());
        let token = manager
            .create_jwt("user-1", "Ada Lovelace", UserRole::Evaluator, None, 3600)
            .unwrap();

        let claims = manager.verify_jwt(&token).unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.full_name, "Ada Lovelace");
        assert_eq!(claims.role, UserRole::Evaluator);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let manager = JwtManager::new("test-secret".to_string());
        // Expired well past the default decode leeway
        let token = manager
            .create_jwt("user-1", "Ada Lovelace", UserRole::Student, None, -600)
            .unwrap();

        assert!(manager.verify_jwt(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let manager = JwtManager::new("test-secret".to_string());
        let token = manager
            .create_jwt("user-1", "Ada Lovelace", UserRole::Student, None, 3600)
            .unwrap();

        let other = JwtManager::new("other-secret".to_string());
        assert!(other.verify_jwt(&token).is_err());
    }
}
