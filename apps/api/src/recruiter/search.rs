//! Candidate search: matches stored profiles against a free-text query and,
//! optionally, the requirements extracted from a job description.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::fallback::RecordSource;
use crate::ingest::pipeline::Pipeline;
use crate::ingest::score::{Score, ESTIMATED_MATCH_RANGE};
use crate::models::profile::UserProfile;
use crate::recruiter::prompts::job_analysis_prompt;
use crate::recruiter::record::{CandidateQuery, CandidateSearchHit};
use crate::store::CareerStore;

/// Maximum number of candidates returned by one search.
pub const SEARCH_LIMIT: i64 = 20;

/// Band used for ATS scores of candidates with no stored analysis.
pub const ESTIMATED_ATS_RANGE: RangeInclusive<u8> = 80..=99;

/// Requirements extracted from a job description, and where they came from.
#[derive(Debug, Clone, Serialize)]
pub struct JobAnalysis {
    pub source: RecordSource,
    pub analysis: CandidateQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSearchResult {
    pub candidates: Vec<CandidateSearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<JobAnalysis>,
}

/// Extracts structured requirements from a job description. Never persisted.
pub async fn analyze_job_description(
    pipeline: &Pipeline<'_>,
    store: &dyn CareerStore,
    user_id: Uuid,
    job_description: &str,
) -> Result<JobAnalysis, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    if store.find_profile(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    let mut extracted = pipeline
        .records::<CandidateQuery>(&job_analysis_prompt(job_description))
        .await?;
    // object kinds always carry exactly one record
    let analysis = extracted.records.remove(0);
    Ok(JobAnalysis {
        source: extracted.source,
        analysis,
    })
}

/// Finds profiles whose bio or industry contains `query`, best match first.
///
/// When a job description is supplied its requirements drive the match score.
/// Requirements that came from the fallback set are not used for scoring.
pub async fn search_candidates(
    pipeline: &Pipeline<'_>,
    store: &dyn CareerStore,
    user_id: Uuid,
    query: &str,
    job_description: Option<&str>,
) -> Result<CandidateSearchResult, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let criteria = match job_description.filter(|jd| !jd.trim().is_empty()) {
        Some(jd) => Some(analyze_job_description(pipeline, store, user_id, jd).await?),
        None => {
            if store.find_profile(user_id).await?.is_none() {
                return Err(AppError::NotFound(format!("User {user_id} not found")));
            }
            None
        }
    };
    let wanted = criteria
        .as_ref()
        .filter(|c| c.source == RecordSource::Model)
        .map(|c| c.analysis.wanted_skills())
        .unwrap_or_default();

    let profiles = store.search_profiles(query, SEARCH_LIMIT).await?;
    let mut candidates = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let latest_ats = store
            .analyses_for_user(profile.id, 1)
            .await?
            .first()
            .map(|a| a.score);
        candidates.push(build_hit(profile, &wanted, latest_ats));
    }
    candidates.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    info!(
        "Candidate search '{query}' for user {user_id}: {} hits",
        candidates.len()
    );
    Ok(CandidateSearchResult {
        candidates,
        criteria,
    })
}

/// Share of `wanted` skills present in the profile, with the matched skill names.
/// `None` when either side has no skills to compare.
pub fn skill_overlap(wanted: &[String], skills: &[String]) -> Option<(Score, Vec<String>)> {
    if wanted.is_empty() || skills.is_empty() {
        return None;
    }
    let wanted: HashSet<&str> = wanted.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let matched: Vec<String> = skills
        .iter()
        .filter(|skill| {
            let key = skill.to_lowercase();
            wanted.contains(key.as_str()) && seen.insert(key)
        })
        .cloned()
        .collect();
    let share = matched.len() as f64 / wanted.len() as f64;
    let score = Score::new((share * 100.0).round() as u8);
    Some((score, matched))
}

fn build_hit(
    profile: UserProfile,
    wanted: &[String],
    latest_ats: Option<i16>,
) -> CandidateSearchHit {
    let (match_score, match_score_estimated, matched_skills) =
        match skill_overlap(wanted, &profile.skills) {
            Some((score, matched)) => (score, false, matched),
            None => (Score::estimate(ESTIMATED_MATCH_RANGE), true, Vec::new()),
        };
    let (ats_score, ats_score_estimated) = match latest_ats {
        Some(score) => (Score::new(score.clamp(0, 100) as u8), false),
        None => (Score::estimate(ESTIMATED_ATS_RANGE), true),
    };

    CandidateSearchHit {
        id: profile.id,
        name: profile.name,
        email: profile.email,
        image_url: profile.image_url,
        industry: profile.industry,
        bio: profile.bio,
        skills: profile.skills,
        experience_years: profile.experience_years,
        match_score,
        match_score_estimated,
        ats_score,
        ats_score_estimated,
        matched_skills,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ats::record::AnalysisRecord;
    use crate::ingest::identity::derive;
    use crate::ingest::kind::CandidateRecord;
    use crate::llm_client::fake::CannedGenerator;
    use crate::store::memory::{profile, InMemoryStore};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skill_overlap_share() {
        let wanted = strings(&["kafka", "rust", "sql", "terraform"]);
        let (score, matched) =
            skill_overlap(&wanted, &strings(&["Rust", "SQL", "React", "rust"])).unwrap();
        assert_eq!(score.value(), 50);
        assert_eq!(matched, strings(&["Rust", "SQL"]));
    }

    #[test]
    fn test_skill_overlap_needs_both_sides() {
        assert!(skill_overlap(&[], &strings(&["Rust"])).is_none());
        assert!(skill_overlap(&strings(&["rust"]), &[]).is_none());
    }

    #[test]
    fn test_hit_without_skills_is_estimated() {
        let hit = build_hit(profile("Bo", "Fintech", "", &[]), &strings(&["rust"]), None);
        assert!(hit.match_score_estimated);
        assert!(ESTIMATED_MATCH_RANGE.contains(&hit.match_score.value()));
        assert!(hit.ats_score_estimated);
        assert!(ESTIMATED_ATS_RANGE.contains(&hit.ats_score.value()));
    }

    #[tokio::test]
    async fn test_search_ranks_by_skill_match_and_uses_stored_ats() {
        let store = InMemoryStore::default();
        let recruiter = profile("Rita", "Recruiting", "Hiring manager", &[]);
        let recruiter_id = recruiter.id;
        store.insert_profile(recruiter);

        let strong = profile("Ada", "Fintech", "Payments backend", &["Rust", "SQL"]);
        let strong_id = strong.id;
        store.insert_profile(strong);
        store.insert_profile(profile("Bo", "FinTech", "Mobile", &["Swift"]));
        store.insert_profile(profile("Cy", "Healthcare", "Clinical data", &["Rust"]));

        let analysis = AnalysisRecord::fallback().remove(0);
        store
            .upsert_analysis(strong_id, &derive("cv"), "cv", &analysis)
            .await
            .unwrap();

        let generator = CannedGenerator::replying(
            r#"{"requiredSkills": ["Rust", "SQL"], "jobLevel": "senior"}"#,
        );
        let pipeline = Pipeline::new(&generator, &store, Duration::from_secs(5));

        let result = search_candidates(
            &pipeline,
            &store,
            recruiter_id,
            "fintech",
            Some("Senior Rust engineer, SQL required"),
        )
        .await
        .unwrap();

        assert_eq!(result.candidates.len(), 2);
        let top = &result.candidates[0];
        assert_eq!(top.id, strong_id);
        assert_eq!(top.match_score.value(), 100);
        assert!(!top.match_score_estimated);
        assert_eq!(top.ats_score.value(), 75);
        assert!(!top.ats_score_estimated);
        assert_eq!(result.candidates[1].match_score.value(), 0);
        assert_eq!(result.criteria.unwrap().source, RecordSource::Model);
    }

    #[tokio::test]
    async fn test_fallback_criteria_do_not_drive_scores() {
        let store = InMemoryStore::default();
        let recruiter = profile("Rita", "Recruiting", "Hiring", &[]);
        let recruiter_id = recruiter.id;
        store.insert_profile(recruiter);
        store.insert_profile(profile("Ada", "Fintech", "", &["Communication"]));

        let generator = CannedGenerator::replying("no idea");
        let pipeline = Pipeline::new(&generator, &store, Duration::from_secs(5));

        let result = search_candidates(&pipeline, &store, recruiter_id, "fintech", Some("JD"))
            .await
            .unwrap();

        assert_eq!(result.criteria.as_ref().unwrap().source, RecordSource::Fallback);
        assert!(result.candidates[0].match_score_estimated);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let store = InMemoryStore::default();
        let generator = CannedGenerator::replying("{}");
        let pipeline = Pipeline::new(&generator, &store, Duration::from_secs(5));

        let err = search_candidates(&pipeline, &store, Uuid::new_v4(), "  ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_job_analysis_coerces_model_output() {
        let store = InMemoryStore::default();
        let recruiter = profile("Rita", "Recruiting", "Hiring", &[]);
        let recruiter_id = recruiter.id;
        store.insert_profile(recruiter);
        let generator = CannedGenerator::replying(
            "```json\n{\"requiredSkills\": \"Python\", \"workType\": \"Remote\",}\n```",
        );
        let pipeline = Pipeline::new(&generator, &store, Duration::from_secs(5));

        let analysis = analyze_job_description(&pipeline, &store, recruiter_id, "Data engineer")
            .await
            .unwrap();

        assert_eq!(analysis.source, RecordSource::Model);
        assert_eq!(analysis.analysis.required_skills, vec!["Python"]);
        assert_eq!(
            analysis.analysis.work_type,
            crate::recruiter::record::WorkMode::Remote
        );
    }
}
