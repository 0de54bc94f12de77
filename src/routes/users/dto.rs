use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::routes::auth::dto::UserResponse;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "grace@example.edu")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,

    #[schema(example = "Grace")]
    pub first_name: String,

    #[schema(example = "Hopper")]
    pub last_name: String,

    #[schema(example = "evaluator")]
    pub role: RoleEnum,

    #[serde(default)]
    pub university_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<RoleEnum>,
    pub university_id: Option<Uuid>,
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UserQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub role: Option<RoleEnum>,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteUserResponse {
    pub message: String,
}
