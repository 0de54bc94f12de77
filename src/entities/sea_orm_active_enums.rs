use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_enum")]
#[serde(rename_all = "snake_case")]
pub enum RoleEnum {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "professor")]
    Professor,
    #[sea_orm(string_value = "university_admin")]
    UniversityAdmin,
    #[sea_orm(string_value = "evaluator")]
    Evaluator,
    #[sea_orm(string_value = "system_admin")]
    SystemAdmin,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "submission_status")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "in_review")]
    InReview,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "evaluation_decision")]
#[serde(rename_all = "snake_case")]
pub enum EvaluationDecision {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "needs_info")]
    NeedsInfo,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_level")]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    #[sea_orm(string_value = "undergraduate")]
    Undergraduate,
    #[sea_orm(string_value = "graduate")]
    Graduate,
    #[sea_orm(string_value = "doctoral")]
    Doctoral,
}
