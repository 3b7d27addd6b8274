//! Axum route handlers for course recommendations.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::courses::record::{CourseLevel, CourseRecord};
use crate::courses::service::{recommend_courses, stored_recommendations};
use crate::errors::AppError;
use crate::ingest::fields::Vocabulary;
use crate::ingest::pipeline::IngestOutcome;
use crate::models::course::{CourseFilter, RecommendedCourse};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecommendCoursesRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CourseQuery {
    pub user_id: Uuid,
    pub level: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub recommendations: Vec<RecommendedCourse>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/courses/recommendations
///
/// Generates fresh recommendations from the user's profile. Existing courses are
/// updated in place and the user's scores overwritten.
pub async fn handle_recommend_courses(
    State(state): State<AppState>,
    Json(request): Json<RecommendCoursesRequest>,
) -> Result<Json<IngestOutcome<CourseRecord>>, AppError> {
    let outcome =
        recommend_courses(&state.pipeline(), state.store.as_ref(), request.user_id).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/courses/recommendations?user_id=<uuid>&level=&category=
pub async fn handle_list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<CourseListResponse>, AppError> {
    let level = match query.level.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(CourseLevel::parse_loose(raw).ok_or_else(|| {
            AppError::Validation(format!("Unknown course level '{raw}'"))
        })?),
    };
    let filter = CourseFilter {
        level,
        category: query.category.filter(|c| !c.trim().is_empty()),
    };

    let recommendations =
        stored_recommendations(state.store.as_ref(), query.user_id, &filter).await?;
    Ok(Json(CourseListResponse { recommendations }))
}
