//! `SeaORM` Entity for universities table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "university")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub university_id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub domain: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
    #[sea_orm(has_many = "super::target_course::Entity")]
    TargetCourses,
    #[sea_orm(has_many = "super::submission::Entity")]
    Submissions,
}

impl Related<super::target_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetCourses.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
