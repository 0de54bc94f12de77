use crate::entities::sea_orm_active_enums::{EvaluationDecision, SubmissionStatus};
use crate::entities::{evaluation, submission, transfer_course};
use crate::static_service::DATABASE_CONNECTION;
use crate::workflow::{DecisionError, review_outcome, validate_transition};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

pub struct EvaluationRepository;

impl EvaluationRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn find_by_id(&self, evaluation_id: Uuid) -> Result<Option<evaluation::Model>> {
        let db = self.get_connection();
        let evaluation = evaluation::Entity::find_by_id(evaluation_id).one(db).await?;
        Ok(evaluation)
    }

    pub async fn find_by_transfer_course(
        &self,
        transfer_course_id: Uuid,
    ) -> Result<Option<evaluation::Model>> {
        let db = self.get_connection();
        let evaluation = evaluation::Entity::find()
            .filter(evaluation::Column::TransferCourseId.eq(transfer_course_id))
            .one(db)
            .await?;
        Ok(evaluation)
    }

    pub async fn find_by_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<evaluation::Model>> {
        let db = self.get_connection();
        let evaluations = evaluation::Entity::find()
            .filter(evaluation::Column::SubmissionId.eq(submission_id))
            .all(db)
            .await?;
        Ok(evaluations)
    }

    /// Upserts the single evaluation of one transfer course and recomputes
    /// the submission's aggregate status, all under an exclusive lock on the
    /// submission row. Two evaluators deciding different courses of the same
    /// submission therefore serialize, and the in_review -> completed edge is
    /// taken exactly once.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_decision(
        &self,
        submission_id: Uuid,
        transfer_course_id: Uuid,
        evaluator_id: Uuid,
        decision: EvaluationDecision,
        approved_target_course_id: Option<Uuid>,
        notes: Option<String>,
    ) -> Result<evaluation::Model> {
        let db = self.get_connection();
        let txn = db.begin().await?;
        let now = Utc::now().naive_utc();

        let submission = submission::Entity::find_by_id(submission_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Submission not found"))?;

        // Re-checked under the lock: the submission may have gone terminal
        // since the caller validated.
        if submission.status != SubmissionStatus::InReview {
            return Err(DecisionError::SubmissionNotInReview(submission.status).into());
        }

        let existing = evaluation::Entity::find()
            .filter(evaluation::Column::TransferCourseId.eq(transfer_course_id))
            .one(&txn)
            .await?;

        let stored = match existing {
            Some(previous) => {
                let mut active: evaluation::ActiveModel = previous.into();
                active.evaluator_id = Set(evaluator_id);
                active.decision = Set(decision);
                active.approved_target_course_id = Set(approved_target_course_id);
                active.notes = Set(notes);
                active.updated_at = Set(now);
                active.update(&txn).await?
            }
            None => {
                let active = evaluation::ActiveModel {
                    evaluation_id: Set(Uuid::new_v4()),
                    submission_id: Set(submission_id),
                    transfer_course_id: Set(transfer_course_id),
                    evaluator_id: Set(evaluator_id),
                    decision: Set(decision),
                    approved_target_course_id: Set(approved_target_course_id),
                    notes: Set(notes),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&txn).await?
            }
        };

        let total_courses = transfer_course::Entity::find()
            .filter(transfer_course::Column::SubmissionId.eq(submission_id))
            .count(&txn)
            .await? as usize;

        let decisions: Vec<EvaluationDecision> = evaluation::Entity::find()
            .filter(evaluation::Column::SubmissionId.eq(submission_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|evaluation| evaluation.decision)
            .collect();

        let outcome = review_outcome(total_courses, &decisions);
        if outcome != submission.status {
            validate_transition(submission.status, outcome)?;
            let mut active: submission::ActiveModel = submission.into();
            active.status = Set(outcome);
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(stored)
    }

    // --- analytics --------------------------------------------------------

    pub async fn count_all(&self) -> Result<u64> {
        let db = self.get_connection();
        let count = evaluation::Entity::find().count(db).await?;
        Ok(count)
    }

    pub async fn count_with_decision(&self, decision: EvaluationDecision) -> Result<u64> {
        let db = self.get_connection();
        let count = evaluation::Entity::find()
            .filter(evaluation::Column::Decision.eq(decision))
            .count(db)
            .await?;
        Ok(count)
    }
}
