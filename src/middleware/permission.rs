use http::StatusCode;

use crate::utils::jwt::{TokenClaims, UserRole};

/// Role gate for privileged handlers. An empty allow-list admits any
/// authenticated principal; the extractor has already handled the
/// unauthenticated case with 401.
pub fn require_roles(
    claims: &TokenClaims,
    allowed: &[UserRole],
) -> Result<(), (StatusCode, String)> {
    if allowed.is_empty() || allowed.contains(&claims.role) {
        return Ok(());
    }

    Err((
        StatusCode::FORBIDDEN,
        "You do not have permission to perform this action".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(role: UserRole) -> TokenClaims {
        TokenClaims {
            user_id: "00000000-0000-0000-0000-000000000001".to_string(),
            full_name: "Test User".to_string(),
            role,
            university_id: None,
            iat: 0,
            exp: i64::MAX,
        }
    }

    #[test]
    fn empty_allow_list_admits_any_authenticated_role() {
        for role in [
            UserRole::Student,
            UserRole::Professor,
            UserRole::UniversityAdmin,
            UserRole::Evaluator,
            UserRole::SystemAdmin,
        ] {
            assert!(require_roles(&claims_for(role), &[]).is_ok());
        }
    }

    #[test]
    fn matching_role_is_admitted() {
        let claims = claims_for(UserRole::Evaluator);
        assert!(
            require_roles(&claims, &[UserRole::Evaluator, UserRole::SystemAdmin]).is_ok()
        );
    }

    #[test]
    fn mismatched_role_is_forbidden() {
        let claims = claims_for(UserRole::Student);
        let err = require_roles(&claims, &[UserRole::SystemAdmin]).unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }
}
