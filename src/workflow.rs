//! Submission lifecycle and evaluation decision rules.
//!
//! Status writes anywhere in the service go through [`validate_transition`];
//! an illegal edge is an error, never a silent coercion. Decision writes go
//! through [`validate_decision`] before they touch the database.

use thiserror::Error;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{EvaluationDecision, SubmissionStatus};
use crate::entities::target_course;
use crate::utils::jwt::UserRole;

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },
    #[error("cannot submit for review without at least one transfer course")]
    NoTransferCourses,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Completed | SubmissionStatus::Rejected)
    }

    /// Directed edges of the lifecycle. `Processing -> Pending` is the revert
    /// taken when a matching run fails, so analyze can be retried.
    pub fn allowed_next(self) -> &'static [SubmissionStatus] {
        match self {
            SubmissionStatus::Draft => &[SubmissionStatus::Pending],
            SubmissionStatus::Pending => &[SubmissionStatus::Processing],
            SubmissionStatus::Processing => {
                &[SubmissionStatus::InReview, SubmissionStatus::Pending]
            }
            SubmissionStatus::InReview => {
                &[SubmissionStatus::Completed, SubmissionStatus::Rejected]
            }
            SubmissionStatus::Completed => &[SubmissionStatus::Rejected],
            SubmissionStatus::Rejected => &[],
        }
    }
}

/// Same-state writes are idempotent no-ops; everything else must follow an
/// edge of [`SubmissionStatus::allowed_next`].
pub fn validate_transition(
    from: SubmissionStatus,
    to: SubmissionStatus,
) -> Result<(), TransitionError> {
    if from == to || from.allowed_next().contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::InvalidTransition { from, to })
    }
}

impl EvaluationDecision {
    /// Terminal decisions count towards submission completion; `pending` and
    /// `needs_info` block it.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EvaluationDecision::Approved | EvaluationDecision::Rejected
        )
    }
}

/// Aggregate status of an in-review submission: `completed` exactly when
/// every transfer course carries a terminal decision.
pub fn review_outcome(
    total_courses: usize,
    decisions: &[EvaluationDecision],
) -> SubmissionStatus {
    if total_courses > 0
        && decisions.len() >= total_courses
        && decisions.iter().all(|decision| decision.is_terminal())
    {
        SubmissionStatus::Completed
    } else {
        SubmissionStatus::InReview
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DecisionError {
    #[error("only evaluators and system admins can record decisions")]
    NotPermitted,
    #[error("an approval must name the target course being credited")]
    MissingApprovedCourse,
    #[error("only an approval may carry an approved target course")]
    UnexpectedApprovedCourse,
    #[error("approved target course is inactive")]
    ApprovedCourseInactive,
    #[error(
        "approved target course belongs to a different university than the submission's target"
    )]
    CrossUniversityApproval,
    #[error("submission is {0:?}; decisions can only be recorded while it is in review")]
    SubmissionNotInReview(SubmissionStatus),
}

pub fn validate_decision(
    role: UserRole,
    submission_status: SubmissionStatus,
    target_university_id: Uuid,
    decision: EvaluationDecision,
    approved_course: Option<&target_course::Model>,
) -> Result<(), DecisionError> {
    if role != UserRole::Evaluator && role != UserRole::SystemAdmin {
        return Err(DecisionError::NotPermitted);
    }

    if submission_status != SubmissionStatus::InReview {
        return Err(DecisionError::SubmissionNotInReview(submission_status));
    }

    match decision {
        EvaluationDecision::Approved => {
            let course = approved_course.ok_or(DecisionError::MissingApprovedCourse)?;
            if !course.is_active {
                return Err(DecisionError::ApprovedCourseInactive);
            }
            if course.university_id != target_university_id {
                return Err(DecisionError::CrossUniversityApproval);
            }
        }
        EvaluationDecision::Pending
        | EvaluationDecision::Rejected
        | EvaluationDecision::NeedsInfo => {
            if approved_course.is_some() {
                return Err(DecisionError::UnexpectedApprovedCourse);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::CourseLevel;

    // Both enums have Pending and Rejected variants, so keep them apart
    use EvaluationDecision as D;
    use SubmissionStatus as S;

    fn catalog_course(university_id: Uuid, is_active: bool) -> target_course::Model {
        let now = chrono::Utc::now().naive_utc();
        target_course::Model {
            course_id: Uuid::new_v4(),
            university_id,
            course_code: "CS101".to_string(),
            course_name: "Intro to Computer Science".to_string(),
            department: Some("Computer Science".to_string()),
            credits: 3.0,
            course_level: CourseLevel::Undergraduate,
            description: None,
            learning_outcomes: None,
            prerequisites: None,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn forward_edges_are_legal() {
        for (from, to) in [
            (S::Draft, S::Pending),
            (S::Pending, S::Processing),
            (S::Processing, S::InReview),
            (S::Processing, S::Pending),
            (S::InReview, S::Completed),
            (S::InReview, S::Rejected),
            (S::Completed, S::Rejected),
        ] {
            assert_eq!(validate_transition(from, to), Ok(()), "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn skipping_and_backward_edges_are_rejected() {
        for (from, to) in [
            (S::Draft, S::InReview),
            (S::Draft, S::Completed),
            (S::Pending, S::InReview),
            (S::Pending, S::Completed),
            (S::Pending, S::Draft),
            (S::InReview, S::Pending),
            (S::InReview, S::Processing),
            (S::Completed, S::InReview),
            (S::Rejected, S::InReview),
            (S::Rejected, S::Completed),
        ] {
            assert_eq!(
                validate_transition(from, to),
                Err(TransitionError::InvalidTransition { from, to }),
                "{from:?} -> {to:?}"
            );
        }
    }

    #[test]
    fn same_state_write_is_a_no_op() {
        for status in [
            S::Draft,
            S::Pending,
            S::Processing,
            S::InReview,
            S::Completed,
            S::Rejected,
        ] {
            assert_eq!(validate_transition(status, status), Ok(()));
        }
    }

    #[test]
    fn all_terminal_decisions_complete_the_review() {
        assert_eq!(
            review_outcome(3, &[D::Approved, D::Rejected, D::Approved]),
            S::Completed
        );
        assert_eq!(review_outcome(1, &[D::Rejected]), S::Completed);
    }

    #[test]
    fn needs_info_blocks_completion() {
        assert_eq!(
            review_outcome(3, &[D::Approved, D::NeedsInfo, D::Rejected]),
            S::InReview
        );
    }

    #[test]
    fn pending_or_missing_decisions_block_completion() {
        assert_eq!(
            review_outcome(3, &[D::Approved, D::Pending, D::Rejected]),
            S::InReview
        );
        assert_eq!(review_outcome(3, &[D::Approved, D::Rejected]), S::InReview);
        assert_eq!(review_outcome(3, &[]), S::InReview);
        assert_eq!(review_outcome(0, &[]), S::InReview);
    }

    #[test]
    fn only_evaluators_and_system_admins_may_decide() {
        let university = Uuid::new_v4();
        for role in [
            UserRole::Student,
            UserRole::Professor,
            UserRole::UniversityAdmin,
        ] {
            assert_eq!(
                validate_decision(role, S::InReview, university, D::Rejected, None),
                Err(DecisionError::NotPermitted)
            );
        }
        assert_eq!(
            validate_decision(
                UserRole::Evaluator,
                S::InReview,
                university,
                D::Rejected,
                None
            ),
            Ok(())
        );
        assert_eq!(
            validate_decision(
                UserRole::SystemAdmin,
                S::InReview,
                university,
                D::NeedsInfo,
                None
            ),
            Ok(())
        );
    }

    #[test]
    fn approval_requires_an_active_course_of_the_target_university() {
        let university = Uuid::new_v4();
        let course = catalog_course(university, true);

        assert_eq!(
            validate_decision(
                UserRole::Evaluator,
                S::InReview,
                university,
                D::Approved,
                None
            ),
            Err(DecisionError::MissingApprovedCourse)
        );
        assert_eq!(
            validate_decision(
                UserRole::Evaluator,
                S::InReview,
                university,
                D::Approved,
                Some(&course)
            ),
            Ok(())
        );

        let inactive = catalog_course(university, false);
        assert_eq!(
            validate_decision(
                UserRole::Evaluator,
                S::InReview,
                university,
                D::Approved,
                Some(&inactive)
            ),
            Err(DecisionError::ApprovedCourseInactive)
        );
    }

    #[test]
    fn cross_university_approval_is_invalid() {
        let university = Uuid::new_v4();
        let foreign_course = catalog_course(Uuid::new_v4(), true);

        assert_eq!(
            validate_decision(
                UserRole::Evaluator,
                S::InReview,
                university,
                D::Approved,
                Some(&foreign_course)
            ),
            Err(DecisionError::CrossUniversityApproval)
        );
    }

    #[test]
    fn non_approvals_must_not_carry_a_course() {
        let university = Uuid::new_v4();
        let course = catalog_course(university, true);

        for decision in [D::Rejected, D::NeedsInfo, D::Pending] {
            assert_eq!(
                validate_decision(
                    UserRole::Evaluator,
                    S::InReview,
                    university,
                    decision,
                    Some(&course)
                ),
                Err(DecisionError::UnexpectedApprovedCourse)
            );
        }
    }

    #[test]
    fn decisions_are_refused_outside_review() {
        let university = Uuid::new_v4();
        for status in [
            S::Draft,
            S::Pending,
            S::Processing,
            S::Completed,
            S::Rejected,
        ] {
            assert_eq!(
                validate_decision(UserRole::Evaluator, status, university, D::Rejected, None),
                Err(DecisionError::SubmissionNotInReview(status))
            );
        }
    }
}
