pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{ats, courses, jobs, recruiter};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Course recommendations
        .route(
            "/api/v1/courses/recommendations",
            post(courses::handlers::handle_recommend_courses)
                .get(courses::handlers::handle_list_courses),
        )
        // Job matches
        .route(
            "/api/v1/jobs/matches",
            post(jobs::handlers::handle_match_jobs).get(jobs::handlers::handle_list_matches),
        )
        // ATS analysis
        .route(
            "/api/v1/ats/analyses",
            post(ats::handlers::handle_analyze_resume).get(ats::handlers::handle_list_analyses),
        )
        // Recruiter tools
        .route(
            "/api/v1/recruiter/job-analysis",
            post(recruiter::handlers::handle_job_analysis),
        )
        .route(
            "/api/v1/recruiter/candidates",
            post(recruiter::handlers::handle_search_candidates),
        )
        .with_state(state)
}
