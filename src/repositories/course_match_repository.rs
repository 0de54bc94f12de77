use crate::entities::course_match;
use crate::static_service::DATABASE_CONNECTION;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

pub struct CourseMatchRepository;

/// One ranked candidate produced by an analysis run; rank is assigned from
/// the position in the stored list.
pub struct NewCourseMatch {
    pub target_course_id: Uuid,
    pub similarity_score: f64,
    pub explanation: Option<String>,
    pub key_similarities: Option<Value>,
    pub important_differences: Option<Value>,
    pub recommendation: Option<String>,
}

impl CourseMatchRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    /// A fresh analysis run replaces a course's matches instead of appending,
    /// so rank 1 always means the current best candidate.
    pub async fn replace_for_transfer_course(
        &self,
        transfer_course_id: Uuid,
        matches: Vec<NewCourseMatch>,
    ) -> Result<Vec<course_match::Model>> {
        let db = self.get_connection();
        let txn = db.begin().await?;
        let now = Utc::now().naive_utc();

        course_match::Entity::delete_many()
            .filter(course_match::Column::TransferCourseId.eq(transfer_course_id))
            .exec(&txn)
            .await?;

        let mut stored = Vec::with_capacity(matches.len());
        for (index, candidate) in matches.into_iter().enumerate() {
            let match_model = course_match::ActiveModel {
                match_id: Set(Uuid::new_v4()),
                transfer_course_id: Set(transfer_course_id),
                target_course_id: Set(candidate.target_course_id),
                similarity_score: Set(candidate.similarity_score),
                explanation: Set(candidate.explanation),
                key_similarities: Set(candidate.key_similarities),
                important_differences: Set(candidate.important_differences),
                recommendation: Set(candidate.recommendation),
                rank: Set(index as i32 + 1),
                created_at: Set(now),
            };
            stored.push(match_model.insert(&txn).await?);
        }

        txn.commit().await?;
        Ok(stored)
    }

    pub async fn find_by_transfer_course(
        &self,
        transfer_course_id: Uuid,
    ) -> Result<Vec<course_match::Model>> {
        let db = self.get_connection();
        let matches = course_match::Entity::find()
            .filter(course_match::Column::TransferCourseId.eq(transfer_course_id))
            .order_by_asc(course_match::Column::Rank)
            .all(db)
            .await?;
        Ok(matches)
    }
}
