//! Axum route handlers for ATS resume analysis.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ats::service::{analysis_history, analyze_resume};
use crate::errors::AppError;
use crate::ingest::fallback::RecordSource;
use crate::models::analysis::AnalysisRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeResumeRequest {
    pub user_id: Uuid,
    pub file_name: Option<String>,
    /// Plain text already extracted from the resume document.
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResumeResponse {
    pub source: RecordSource,
    pub analysis: AnalysisRow,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AnalysisHistoryResponse {
    pub analyses: Vec<AnalysisRow>,
}

/// POST /api/v1/ats/analyses
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    let outcome = analyze_resume(
        &state.pipeline(),
        state.store.as_ref(),
        request.user_id,
        request.file_name.as_deref(),
        &request.resume_text,
    )
    .await?;

    Ok(Json(AnalyzeResumeResponse {
        source: outcome.source,
        analysis: outcome.analysis,
    }))
}

/// GET /api/v1/ats/analyses?user_id=<uuid>
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<AnalysisHistoryResponse>, AppError> {
    let analyses = analysis_history(state.store.as_ref(), query.user_id).await?;
    Ok(Json(AnalysisHistoryResponse { analyses }))
}
