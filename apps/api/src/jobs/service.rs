use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::pipeline::{IngestOutcome, Pipeline};
use crate::ingest::reconcile::IngestContext;
use crate::jobs::prompts::match_prompt;
use crate::jobs::record::{JobRecord, JobType};
use crate::models::job::MatchedJob;
use crate::store::CareerStore;

/// Search preferences the caller may attach to a match request. All optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPreferences {
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub salary_min: Option<i64>,
    pub job_type: Option<JobType>,
}

/// Generates job matches for the user's profile and preferences and persists them.
pub async fn match_jobs(
    pipeline: &Pipeline<'_>,
    store: &dyn CareerStore,
    user_id: Uuid,
    preferences: &JobPreferences,
) -> Result<IngestOutcome<JobRecord>, AppError> {
    let profile = store
        .find_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    let prompt = match_prompt(&profile, preferences);
    Ok(pipeline
        .run::<JobRecord>(&prompt, &IngestContext::for_user(user_id))
        .await?)
}

pub async fn stored_matches(
    store: &dyn CareerStore,
    user_id: Uuid,
    job_type: Option<JobType>,
) -> Result<Vec<MatchedJob>, AppError> {
    Ok(store.job_matches(user_id, job_type).await?)
}
