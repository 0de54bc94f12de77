//! `SeaORM` Entity for the receiving university's course catalog

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CourseLevel;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "target_course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub course_id: Uuid,
    pub university_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub department: Option<String>,
    pub credits: f64,
    pub course_level: CourseLevel,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub prerequisites: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::university::Entity",
        from = "Column::UniversityId",
        to = "super::university::Column::UniversityId"
    )]
    University,
    #[sea_orm(has_many = "super::course_match::Entity")]
    CourseMatches,
}

impl Related<super::university::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::University.def()
    }
}

impl Related<super::course_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseMatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
