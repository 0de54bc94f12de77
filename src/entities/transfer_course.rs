//! `SeaORM` Entity for courses a student wants evaluated

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transfer_course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub transfer_course_id: Uuid,
    pub submission_id: Uuid,
    pub course_code: Option<String>,
    pub course_name: String,
    pub credits: Option<f64>,
    pub grade: Option<String>,
    pub source_university_name: Option<String>,
    pub syllabus_file_path: Option<String>,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub additional_notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submission::Entity",
        from = "Column::SubmissionId",
        to = "super::submission::Column::SubmissionId"
    )]
    Submission,
    #[sea_orm(has_many = "super::course_match::Entity")]
    CourseMatches,
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::course_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseMatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
