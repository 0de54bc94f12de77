//! `SeaORM` Entity for student submissions

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SubmissionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub submission_id: Uuid,
    pub student_id: Uuid,
    pub target_university_id: Uuid,
    pub transcript_file_path: Option<String>,
    pub status: SubmissionStatus,
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::UserId"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::university::Entity",
        from = "Column::TargetUniversityId",
        to = "super::university::Column::UniversityId"
    )]
    TargetUniversity,
    #[sea_orm(has_many = "super::transfer_course::Entity")]
    TransferCourses,
    #[sea_orm(has_many = "super::evaluation::Entity")]
    Evaluations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::university::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetUniversity.def()
    }
}

impl Related<super::transfer_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransferCourses.def()
    }
}

impl Related<super::evaluation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
