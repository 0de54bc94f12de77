use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::university;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUniversityRequest {
    #[schema(example = "Example State University")]
    pub name: String,

    /// Used for email affiliation checks, unique across universities
    #[schema(example = "example.edu")]
    pub domain: String,

    pub description: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UniversityResponse {
    pub university_id: Uuid,
    pub name: String,
    pub domain: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl From<university::Model> for UniversityResponse {
    fn from(university: university::Model) -> Self {
        Self {
            university_id: university.university_id,
            name: university.name,
            domain: university.domain,
            description: university.description,
            location: university.location,
            website: university.website,
            is_active: university.is_active,
            created_at: university.created_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQueryParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CatalogQueryParams {
    pub department: Option<String>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}
