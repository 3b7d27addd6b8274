//! Axum route handlers for job matches.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::fields::Vocabulary;
use crate::ingest::pipeline::IngestOutcome;
use crate::jobs::record::{JobRecord, JobType};
use crate::jobs::service::{match_jobs, stored_matches, JobPreferences};
use crate::models::job::MatchedJob;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchJobsRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub preferences: JobPreferences,
}

#[derive(Debug, Deserialize)]
pub struct JobMatchQuery {
    pub user_id: Uuid,
    pub job_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobMatchListResponse {
    pub matches: Vec<MatchedJob>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/matches
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(request): Json<MatchJobsRequest>,
) -> Result<Json<IngestOutcome<JobRecord>>, AppError> {
    let outcome = match_jobs(
        &state.pipeline(),
        state.store.as_ref(),
        request.user_id,
        &request.preferences,
    )
    .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/jobs/matches?user_id=<uuid>&job_type=
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Query(query): Query<JobMatchQuery>,
) -> Result<Json<JobMatchListResponse>, AppError> {
    let job_type = match query.job_type.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            JobType::parse_loose(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown job type '{raw}'")))?,
        ),
    };

    let matches = stored_matches(state.store.as_ref(), query.user_id, job_type).await?;
    Ok(Json(JobMatchListResponse { matches }))
}
