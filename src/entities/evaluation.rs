//! `SeaORM` Entity for evaluator decisions, at most one per transfer course

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EvaluationDecision;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub evaluation_id: Uuid,
    pub submission_id: Uuid,
    #[sea_orm(unique)]
    pub transfer_course_id: Uuid,
    pub evaluator_id: Uuid,
    pub decision: EvaluationDecision,
    pub approved_target_course_id: Option<Uuid>,
    pub notes: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::transfer_course::Entity",
        from = "Column::TransferCourseId",
        to = "super::transfer_course::Column::TransferCourseId"
    )]
    TransferCourse,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::EvaluatorId",
        to = "super::user::Column::UserId"
    )]
    Evaluator,
    #[sea_orm(
        belongs_to = "super::target_course::Entity",
        from = "Column::ApprovedTargetCourseId",
        to = "super::target_course::Column::CourseId"
    )]
    ApprovedTargetCourse,
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::transfer_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransferCourse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
