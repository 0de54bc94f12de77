//! `SeaORM` Entity for AI-proposed catalog matches

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_match")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub match_id: Uuid,
    pub transfer_course_id: Uuid,
    pub target_course_id: Uuid,
    /// 0-100, higher is closer
    pub similarity_score: f64,
    pub explanation: Option<String>,
    pub key_similarities: Option<Value>,
    pub important_differences: Option<Value>,
    pub recommendation: Option<String>,
    /// 1 = best match
    pub rank: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transfer_course::Entity",
        from = "Column::TransferCourseId",
        to = "super::transfer_course::Column::TransferCourseId"
    )]
    TransferCourse,
    #[sea_orm(
        belongs_to = "super::target_course::Entity",
        from = "Column::TargetCourseId",
        to = "super::target_course::Column::CourseId"
    )]
    TargetCourse,
}

impl Related<super::transfer_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransferCourse.def()
    }
}

impl Related<super::target_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetCourse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
