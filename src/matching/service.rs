use anyhow::Result;
use serde_json::json;
use uuid::Uuid;

use crate::config::MATCH_TOP_N;
use crate::entities::sea_orm_active_enums::SubmissionStatus;
use crate::matching::provider::MatchProvider;
use crate::repositories::{
    CourseMatchRepository, NewCourseMatch, SubmissionRepository, TargetCourseRepository,
};

/// Detached analysis task. The analyze endpoint has already moved the
/// submission to `processing`; this walks every transfer course, replaces its
/// matches with the provider's fresh ranking and finishes the submission into
/// `in_review`. A failed run is parked back in `pending` so it can be
/// retried.
pub async fn run_matching_analysis(submission_id: Uuid) {
    if let Err(error) = analyze_submission(submission_id).await {
        tracing::error!(
            submission_id = %submission_id,
            "Matching analysis failed: {}",
            error
        );

        let submission_repo = SubmissionRepository::new();
        if let Err(revert_error) = submission_repo
            .set_status(submission_id, SubmissionStatus::Pending)
            .await
        {
            tracing::error!(
                submission_id = %submission_id,
                "Failed to revert submission to pending after analysis error: {}",
                revert_error
            );
        }
    }
}

async fn analyze_submission(submission_id: Uuid) -> Result<()> {
    let submission_repo = SubmissionRepository::new();
    let submission = submission_repo
        .find_by_id(submission_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Submission not found"))?;

    let targets = TargetCourseRepository::new()
        .find_matching_catalog(submission.target_university_id)
        .await?;

    if targets.is_empty() {
        tracing::warn!(
            submission_id = %submission_id,
            "Target university has no active catalog; review proceeds without match candidates"
        );
    }

    let transfer_courses = submission_repo.find_transfer_courses(submission_id).await?;
    let provider = MatchProvider::from_config();
    let match_repo = CourseMatchRepository::new();

    for transfer_course in &transfer_courses {
        let candidates = provider.rank(transfer_course, &targets, MATCH_TOP_N).await;

        let new_matches: Vec<NewCourseMatch> = candidates
            .into_iter()
            .map(|candidate| NewCourseMatch {
                target_course_id: candidate.target_course_id,
                similarity_score: candidate.similarity_score,
                explanation: Some(candidate.explanation),
                key_similarities: Some(json!(candidate.key_similarities)),
                important_differences: Some(json!(candidate.important_differences)),
                recommendation: candidate.recommendation,
            })
            .collect();

        match_repo
            .replace_for_transfer_course(transfer_course.transfer_course_id, new_matches)
            .await?;
    }

    submission_repo
        .set_status(submission_id, SubmissionStatus::InReview)
        .await?;

    tracing::info!(
        submission_id = %submission_id,
        courses = transfer_courses.len(),
        "Matching analysis completed"
    );

    Ok(())
}
