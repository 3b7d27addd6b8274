use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::courses::record::CourseLevel;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseRow {
    pub id: String,
    pub title: String,
    pub provider: String,
    pub rating: f64,
    pub students: i64,
    pub duration: String,
    pub level: String,
    pub price: String,
    pub skills: Vec<String>,
    pub description: String,
    pub category: String,
    pub external_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course joined with the requesting user's recommendation for it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecommendedCourse {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: CourseRow,
    pub recommendation_score: i16,
    pub score_estimated: bool,
    pub reasons: Vec<String>,
}

/// Optional narrowing for stored course recommendations. Category matches case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub level: Option<CourseLevel>,
    pub category: Option<String>,
}
