use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub salary: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub remote: bool,
    pub posted_date: String,
    pub skills: Vec<String>,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub external_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job posting joined with the requesting user's match for it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchedJob {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub match_score: i16,
    pub score_estimated: bool,
    pub reasons: Vec<String>,
}
