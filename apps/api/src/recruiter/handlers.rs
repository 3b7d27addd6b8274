//! Axum route handlers for recruiter tools.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::recruiter::search::{
    analyze_job_description, search_candidates, CandidateSearchResult, JobAnalysis,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobAnalysisRequest {
    pub user_id: Uuid,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct CandidateSearchRequest {
    pub user_id: Uuid,
    pub query: String,
    pub job_description: Option<String>,
}

/// POST /api/v1/recruiter/job-analysis
pub async fn handle_job_analysis(
    State(state): State<AppState>,
    Json(request): Json<JobAnalysisRequest>,
) -> Result<Json<JobAnalysis>, AppError> {
    let analysis = analyze_job_description(
        &state.pipeline(),
        state.store.as_ref(),
        request.user_id,
        &request.job_description,
    )
    .await?;
    Ok(Json(analysis))
}

/// POST /api/v1/recruiter/candidates
pub async fn handle_search_candidates(
    State(state): State<AppState>,
    Json(request): Json<CandidateSearchRequest>,
) -> Result<Json<CandidateSearchResult>, AppError> {
    let result = search_candidates(
        &state.pipeline(),
        state.store.as_ref(),
        request.user_id,
        &request.query,
        request.job_description.as_deref(),
    )
    .await?;
    Ok(Json(result))
}
