use std::collections::BTreeSet;

use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::APP_CONFIG;
use crate::entities::{target_course, transfer_course};

/// One ranked candidate for a transfer course, produced by whichever
/// provider ran the analysis.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub target_course_id: Uuid,
    /// 0-100, higher is closer
    pub similarity_score: f64,
    pub explanation: String,
    pub key_similarities: Vec<String>,
    pub important_differences: Vec<String>,
    pub recommendation: Option<String>,
}

/// Matching backends. Gemini is used when an API key is configured and falls
/// back to the lexical scorer on any failure, so an analysis run always
/// produces candidates.
pub enum MatchProvider {
    Gemini(GeminiProvider),
    Lexical(LexicalProvider),
}

impl MatchProvider {
    pub fn from_config() -> Self {
        if APP_CONFIG.gemini_api_key.is_empty() {
            MatchProvider::Lexical(LexicalProvider)
        } else {
            MatchProvider::Gemini(GeminiProvider::new(
                APP_CONFIG.gemini_api_url.clone(),
                APP_CONFIG.gemini_api_key.clone(),
            ))
        }
    }

    pub async fn rank(
        &self,
        transfer: &transfer_course::Model,
        targets: &[target_course::Model],
        top_n: usize,
    ) -> Vec<MatchCandidate> {
        match self {
            MatchProvider::Lexical(provider) => provider.rank(transfer, targets, top_n),
            MatchProvider::Gemini(provider) => {
                match provider.rank(transfer, targets, top_n).await {
                    Ok(candidates) => candidates,
                    Err(error) => {
                        tracing::warn!(
                            "Gemini matching failed, falling back to lexical scorer: {}",
                            error
                        );
                        LexicalProvider.rank(transfer, targets, top_n)
                    }
                }
            }
        }
    }
}

// --- lexical fallback -----------------------------------------------------

/// Deterministic token-overlap scorer. Not a replacement for the AI
/// provider's judgement, but it keeps the pipeline moving without a key and
/// gives stable, reproducible rankings in tests.
pub struct LexicalProvider;

impl LexicalProvider {
    pub fn rank(
        &self,
        transfer: &transfer_course::Model,
        targets: &[target_course::Model],
        top_n: usize,
    ) -> Vec<MatchCandidate> {
        let transfer_terms = tokenize(&transfer_text(transfer));

        let mut scored: Vec<(f64, &target_course::Model, Vec<String>, Vec<String>)> = targets
            .iter()
            .map(|target| {
                let target_terms = tokenize(&target_text(target));
                let score = jaccard_score(&transfer_terms, &target_terms);

                let shared: Vec<String> = transfer_terms
                    .intersection(&target_terms)
                    .take(5)
                    .cloned()
                    .collect();
                let missing: Vec<String> = target_terms
                    .difference(&transfer_terms)
                    .take(5)
                    .cloned()
                    .collect();

                (score, target, shared, missing)
            })
            .collect();

        // Ties break on course code so repeated runs rank identically
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.course_code.cmp(&b.1.course_code))
        });

        scored
            .into_iter()
            .take(top_n)
            .map(|(score, target, shared, missing)| MatchCandidate {
                target_course_id: target.course_id,
                similarity_score: score,
                explanation: format!(
                    "{} shares {} key terms with {} {}",
                    transfer.course_name,
                    shared.len(),
                    target.course_code,
                    target.course_name
                ),
                key_similarities: shared,
                important_differences: missing,
                recommendation: None,
            })
            .collect()
    }
}

fn transfer_text(course: &transfer_course::Model) -> String {
    [
        course.course_code.as_deref().unwrap_or(""),
        &course.course_name,
        course.description.as_deref().unwrap_or(""),
        course.learning_outcomes.as_deref().unwrap_or(""),
        course.additional_notes.as_deref().unwrap_or(""),
    ]
    .join(" ")
}

fn target_text(course: &target_course::Model) -> String {
    [
        course.course_code.as_str(),
        &course.course_name,
        course.department.as_deref().unwrap_or(""),
        course.description.as_deref().unwrap_or(""),
        course.learning_outcomes.as_deref().unwrap_or(""),
    ]
    .join(" ")
}

fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.len() >= 3)
        .map(|term| term.to_string())
        .collect()
}

fn jaccard_score(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    (intersection as f64 / union as f64 * 100.0).round()
}

// --- Gemini ---------------------------------------------------------------

pub struct GeminiProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateRow {
    target_course_id: Uuid,
    similarity_score: f64,
    explanation: Option<String>,
    #[serde(default)]
    key_similarities: Vec<String>,
    #[serde(default)]
    important_differences: Vec<String>,
    recommendation: Option<String>,
}

impl GeminiProvider {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    pub async fn rank(
        &self,
        transfer: &transfer_course::Model,
        targets: &[target_course::Model],
        top_n: usize,
    ) -> Result<Vec<MatchCandidate>> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_matching_prompt(transfer, targets, top_n);

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let text = response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("Gemini response carried no text part"))?;

        let rows: Vec<GeminiCandidateRow> = serde_json::from_str(strip_code_fences(text))?;

        // Keep only rows naming a real catalog entry, in case the model
        // hallucinates an id
        let candidates = rows
            .into_iter()
            .filter(|row| targets.iter().any(|t| t.course_id == row.target_course_id))
            .take(top_n)
            .map(|row| MatchCandidate {
                target_course_id: row.target_course_id,
                similarity_score: row.similarity_score.clamp(0.0, 100.0),
                explanation: row.explanation.unwrap_or_default(),
                key_similarities: row.key_similarities,
                important_differences: row.important_differences,
                recommendation: row.recommendation,
            })
            .collect();

        Ok(candidates)
    }
}

fn build_matching_prompt(
    transfer: &transfer_course::Model,
    targets: &[target_course::Model],
    top_n: usize,
) -> String {
    let mut catalog = String::new();
    for target in targets {
        catalog.push_str(&format!(
            "- id: {} | code: {} | name: {} | credits: {} | description: {}\n",
            target.course_id,
            target.course_code,
            target.course_name,
            target.credits,
            target.description.as_deref().unwrap_or("N/A"),
        ));
    }

    format!(
        "You are a university transfer credit evaluator. Compare the transfer \
course below with the target catalog and return the top {top_n} matches as a \
JSON array. Each element must have: target_course_id, similarity_score (0-100), \
explanation, key_similarities (array of strings), important_differences (array \
of strings), recommendation.\n\n\
TRANSFER COURSE:\ncode: {}\nname: {}\ncredits: {}\ndescription: {}\n\n\
TARGET CATALOG:\n{catalog}\n\
Respond with the JSON array only.",
        transfer.course_code.as_deref().unwrap_or("N/A"),
        transfer.course_name,
        transfer
            .credits
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        transfer.description.as_deref().unwrap_or("N/A"),
    )
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::CourseLevel;

    fn transfer(name: &str, description: &str) -> transfer_course::Model {
        let now = chrono::Utc::now().naive_utc();
        transfer_course::Model {
            transfer_course_id: Uuid::new_v4(),
            submission_id: Uuid::new_v4(),
            course_code: None,
            course_name: name.to_string(),
            credits: Some(3.0),
            grade: None,
            source_university_name: None,
            syllabus_file_path: None,
            description: Some(description.to_string()),
            learning_outcomes: None,
            additional_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn target(code: &str, name: &str, description: &str) -> target_course::Model {
        let now = chrono::Utc::now().naive_utc();
        target_course::Model {
            course_id: Uuid::new_v4(),
            university_id: Uuid::new_v4(),
            course_code: code.to_string(),
            course_name: name.to_string(),
            department: None,
            credits: 3.0,
            course_level: CourseLevel::Undergraduate,
            description: Some(description.to_string()),
            learning_outcomes: None,
            prerequisites: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn scores_stay_in_range_and_closest_ranks_first() {
        let transfer = transfer(
            "Data Structures",
            "linked lists trees hashing asymptotic analysis",
        );
        let targets = vec![
            target("ART100", "Drawing", "charcoal figure studies composition"),
            target(
                "CS201",
                "Data Structures",
                "linked lists trees hashing asymptotic analysis",
            ),
        ];

        let ranked = LexicalProvider.rank(&transfer, &targets, 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].target_course_id, targets[1].course_id);
        for candidate in &ranked {
            assert!((0.0..=100.0).contains(&candidate.similarity_score));
        }
        assert!(ranked[0].similarity_score > ranked[1].similarity_score);
    }

    #[test]
    fn ranking_is_deterministic_across_runs() {
        let transfer = transfer("Calculus I", "limits derivatives integrals");
        let targets = vec![
            target("MATH110", "Calculus A", "limits derivatives"),
            target("MATH111", "Calculus B", "derivatives integrals"),
            target("MATH112", "Calculus C", "limits integrals"),
        ];

        let first = LexicalProvider.rank(&transfer, &targets, 5);
        let second = LexicalProvider.rank(&transfer, &targets, 5);

        let first_ids: Vec<Uuid> = first.iter().map(|c| c.target_course_id).collect();
        let second_ids: Vec<Uuid> = second.iter().map(|c| c.target_course_id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn top_n_caps_the_candidate_list() {
        let transfer = transfer("Physics", "mechanics waves optics");
        let targets: Vec<_> = (0..10)
            .map(|i| target(&format!("PHY{i:03}"), "Physics", "mechanics waves"))
            .collect();

        let ranked = LexicalProvider.rank(&transfer, &targets, 5);
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn empty_catalog_yields_no_candidates() {
        let transfer = transfer("Physics", "mechanics waves optics");
        assert!(LexicalProvider.rank(&transfer, &[], 5).is_empty());
    }

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("[1]"), "[1]");
    }
}
