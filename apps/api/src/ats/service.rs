use tracing::warn;
use uuid::Uuid;

use crate::ats::prompts::analysis_prompt;
use crate::ats::record::{AnalysisRecord, DEFAULT_FILE_NAME};
use crate::errors::AppError;
use crate::ingest::fallback::RecordSource;
use crate::ingest::identity::derive;
use crate::ingest::pipeline::Pipeline;
use crate::ingest::reconcile::IngestContext;
use crate::models::analysis::AnalysisRow;
use crate::store::{CareerStore, StoreError};

/// Number of analyses returned by the history listing.
pub const HISTORY_LIMIT: i64 = 10;

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub source: RecordSource,
    pub analysis: AnalysisRow,
}

/// Scores a resume and stores the result against `(user, file)`. Re-analyzing the
/// same file name replaces the previous result.
pub async fn analyze_resume(
    pipeline: &Pipeline<'_>,
    store: &dyn CareerStore,
    user_id: Uuid,
    file_name: Option<&str>,
    resume_text: &str,
) -> Result<AnalysisOutcome, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if store.find_profile(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    let file_name = file_name
        .map(str::trim)
        .filter(|name| !derive(name).is_empty())
        .unwrap_or(DEFAULT_FILE_NAME);
    let ctx = IngestContext::for_user(user_id).with_file(file_name);

    let mut outcome = pipeline
        .run::<AnalysisRecord>(&analysis_prompt(resume_text), &ctx)
        .await?;

    match outcome.records.pop() {
        Some(record) => Ok(AnalysisOutcome {
            source: outcome.source,
            analysis: record.entity,
        }),
        None => {
            let reason = outcome
                .failures
                .pop()
                .map(|f| f.reason)
                .unwrap_or_else(|| "analysis was not stored".to_string());
            warn!("Analysis for user {user_id} ({file_name}) not stored: {reason}");
            Err(AppError::Store(StoreError::Constraint(reason)))
        }
    }
}

/// Most recent analyses first.
pub async fn analysis_history(
    store: &dyn CareerStore,
    user_id: Uuid,
) -> Result<Vec<AnalysisRow>, AppError> {
    Ok(store.analyses_for_user(user_id, HISTORY_LIMIT).await?)
}
