use crate::entities::sea_orm_active_enums::SubmissionStatus;
use crate::entities::{submission, transfer_course};
use crate::static_service::DATABASE_CONNECTION;
use crate::workflow::{TransitionError, validate_transition};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

pub struct SubmissionRepository;

/// Outcome of a guarded status write. `Noop` means the submission was
/// already in the target status, which callers treat as idempotent success.
pub enum StatusWrite {
    Applied(submission::Model),
    Noop(submission::Model),
}

impl StatusWrite {
    pub fn into_model(self) -> submission::Model {
        match self {
            StatusWrite::Applied(model) | StatusWrite::Noop(model) => model,
        }
    }
}

impl SubmissionRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn create(
        &self,
        submission_id: Uuid,
        student_id: Uuid,
        target_university_id: Uuid,
        notes: Option<String>,
    ) -> Result<submission::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();

        let submission_model = submission::ActiveModel {
            submission_id: Set(submission_id),
            student_id: Set(student_id),
            target_university_id: Set(target_university_id),
            transcript_file_path: Set(None),
            status: Set(SubmissionStatus::Draft),
            notes: Set(notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = submission_model.insert(db).await?;
        Ok(result)
    }

    pub async fn find_by_id(&self, submission_id: Uuid) -> Result<Option<submission::Model>> {
        let db = self.get_connection();
        let submission = submission::Entity::find_by_id(submission_id).one(db).await?;
        Ok(submission)
    }

    pub async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<submission::Model>> {
        let db = self.get_connection();
        let submissions = submission::Entity::find()
            .filter(submission::Column::StudentId.eq(student_id))
            .order_by_desc(submission::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(submissions)
    }

    /// Review queue: submitted work that has not reached a terminal state.
    /// Evaluators affiliated with a university only see its submissions.
    pub async fn find_review_queue(
        &self,
        university_filter: Option<Uuid>,
    ) -> Result<Vec<submission::Model>> {
        let db = self.get_connection();
        let mut query = submission::Entity::find().filter(
            submission::Column::Status
                .is_in([SubmissionStatus::Pending, SubmissionStatus::InReview]),
        );

        if let Some(university_id) = university_filter {
            query = query.filter(submission::Column::TargetUniversityId.eq(university_id));
        }

        let submissions = query
            .order_by_desc(submission::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(submissions)
    }

    pub async fn find_all_with_pagination(
        &self,
        status_filter: Option<SubmissionStatus>,
        university_filter: Option<Uuid>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<submission::Model>, u64)> {
        let db = self.get_connection();
        let mut query = submission::Entity::find();

        if let Some(status) = status_filter {
            query = query.filter(submission::Column::Status.eq(status));
        }
        if let Some(university_id) = university_filter {
            query = query.filter(submission::Column::TargetUniversityId.eq(university_id));
        }

        let total = query.clone().count(db).await?;

        let submissions = query
            .order_by_desc(submission::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;

        Ok((submissions, total))
    }

    pub async fn set_transcript_path(
        &self,
        submission_id: Uuid,
        file_path: String,
    ) -> Result<submission::Model> {
        let submission = self
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Submission not found"))?;
        let db = self.get_connection();

        let mut active: submission::ActiveModel = submission.into();
        active.transcript_file_path = Set(Some(file_path));
        active.updated_at = Set(Utc::now().naive_utc());

        let result = active.update(db).await?;
        Ok(result)
    }

    /// Cascades to transfer courses, matches and evaluations via the schema
    pub async fn delete(&self, submission_id: Uuid) -> Result<()> {
        let db = self.get_connection();
        submission::Entity::delete_by_id(submission_id).exec(db).await?;
        Ok(())
    }

    // --- transfer courses -------------------------------------------------

    pub async fn add_transfer_course(
        &self,
        transfer_course_id: Uuid,
        new_course: NewTransferCourse,
    ) -> Result<transfer_course::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();

        let course_model = transfer_course::ActiveModel {
            transfer_course_id: Set(transfer_course_id),
            submission_id: Set(new_course.submission_id),
            course_code: Set(new_course.course_code),
            course_name: Set(new_course.course_name),
            credits: Set(new_course.credits),
            grade: Set(new_course.grade),
            source_university_name: Set(new_course.source_university_name),
            syllabus_file_path: Set(None),
            description: Set(new_course.description),
            learning_outcomes: Set(new_course.learning_outcomes),
            additional_notes: Set(new_course.additional_notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = course_model.insert(db).await?;
        Ok(result)
    }

    pub async fn find_transfer_courses(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<transfer_course::Model>> {
        let db = self.get_connection();
        let courses = transfer_course::Entity::find()
            .filter(transfer_course::Column::SubmissionId.eq(submission_id))
            .order_by_asc(transfer_course::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(courses)
    }

    pub async fn find_transfer_course(
        &self,
        submission_id: Uuid,
        transfer_course_id: Uuid,
    ) -> Result<Option<transfer_course::Model>> {
        let db = self.get_connection();
        let course = transfer_course::Entity::find_by_id(transfer_course_id)
            .filter(transfer_course::Column::SubmissionId.eq(submission_id))
            .one(db)
            .await?;
        Ok(course)
    }

    pub async fn count_transfer_courses(&self, submission_id: Uuid) -> Result<u64> {
        let db = self.get_connection();
        let count = transfer_course::Entity::find()
            .filter(transfer_course::Column::SubmissionId.eq(submission_id))
            .count(db)
            .await?;
        Ok(count)
    }

    pub async fn set_syllabus_path(
        &self,
        transfer_course_id: Uuid,
        file_path: String,
    ) -> Result<transfer_course::Model> {
        let db = self.get_connection();
        let course = transfer_course::Entity::find_by_id(transfer_course_id)
            .one(db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Transfer course not found"))?;

        let mut active: transfer_course::ActiveModel = course.into();
        active.syllabus_file_path = Set(Some(file_path));
        active.updated_at = Set(Utc::now().naive_utc());

        let result = active.update(db).await?;
        Ok(result)
    }

    // --- guarded status writes --------------------------------------------

    /// Locks the submission row for the duration of the write so concurrent
    /// actions on the same submission serialize instead of racing.
    async fn lock_submission(
        txn: &DatabaseTransaction,
        submission_id: Uuid,
    ) -> Result<submission::Model> {
        let submission = submission::Entity::find_by_id(submission_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Submission not found"))?;
        Ok(submission)
    }

    /// Single entry point for lifecycle writes. Illegal edges surface as
    /// [`TransitionError`]; a write into the current status is a no-op.
    pub async fn set_status(
        &self,
        submission_id: Uuid,
        to: SubmissionStatus,
    ) -> Result<StatusWrite> {
        let db = self.get_connection();
        let txn = db.begin().await?;

        let submission = Self::lock_submission(&txn, submission_id).await?;

        if submission.status == to {
            txn.commit().await?;
            return Ok(StatusWrite::Noop(submission));
        }

        validate_transition(submission.status, to)?;

        let mut active: submission::ActiveModel = submission.into();
        active.status = Set(to);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(StatusWrite::Applied(updated))
    }

    /// draft -> pending, refused while the submission has no courses
    pub async fn submit_for_review(&self, submission_id: Uuid) -> Result<StatusWrite> {
        let db = self.get_connection();
        let txn = db.begin().await?;

        let submission = Self::lock_submission(&txn, submission_id).await?;

        let course_count = transfer_course::Entity::find()
            .filter(transfer_course::Column::SubmissionId.eq(submission_id))
            .count(&txn)
            .await?;
        if course_count == 0 {
            return Err(TransitionError::NoTransferCourses.into());
        }

        if submission.status == SubmissionStatus::Pending {
            txn.commit().await?;
            return Ok(StatusWrite::Noop(submission));
        }

        validate_transition(submission.status, SubmissionStatus::Pending)?;

        let mut active: submission::ActiveModel = submission.into();
        active.status = Set(SubmissionStatus::Pending);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(StatusWrite::Applied(updated))
    }

    /// Whole-submission rejection, distinct from per-course rejected decisions
    pub async fn reject(
        &self,
        submission_id: Uuid,
        notes: Option<String>,
    ) -> Result<submission::Model> {
        let db = self.get_connection();
        let txn = db.begin().await?;

        let submission = Self::lock_submission(&txn, submission_id).await?;

        validate_transition(submission.status, SubmissionStatus::Rejected)?;

        let mut active: submission::ActiveModel = submission.into();
        active.status = Set(SubmissionStatus::Rejected);
        if let Some(notes) = notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    // --- analytics --------------------------------------------------------

    pub async fn count_all(&self) -> Result<u64> {
        let db = self.get_connection();
        let count = submission::Entity::find().count(db).await?;
        Ok(count)
    }

    pub async fn count_with_status(&self, statuses: &[SubmissionStatus]) -> Result<u64> {
        let db = self.get_connection();
        let count = submission::Entity::find()
            .filter(submission::Column::Status.is_in(statuses.iter().copied()))
            .count(db)
            .await?;
        Ok(count)
    }
}

pub struct NewTransferCourse {
    pub submission_id: Uuid,
    pub course_code: Option<String>,
    pub course_name: String,
    pub credits: Option<f64>,
    pub grade: Option<String>,
    pub source_university_name: Option<String>,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub additional_notes: Option<String>,
}
