use uuid::Uuid;

use crate::courses::prompts::recommendation_prompt;
use crate::courses::record::CourseRecord;
use crate::errors::AppError;
use crate::ingest::pipeline::{IngestOutcome, Pipeline};
use crate::ingest::reconcile::IngestContext;
use crate::models::course::{CourseFilter, RecommendedCourse};
use crate::store::CareerStore;

/// Generates course recommendations for the user's profile and persists them.
pub async fn recommend_courses(
    pipeline: &Pipeline<'_>,
    store: &dyn CareerStore,
    user_id: Uuid,
) -> Result<IngestOutcome<CourseRecord>, AppError> {
    let profile = store
        .find_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    let prompt = recommendation_prompt(&profile);
    Ok(pipeline
        .run::<CourseRecord>(&prompt, &IngestContext::for_user(user_id))
        .await?)
}

pub async fn stored_recommendations(
    store: &dyn CareerStore,
    user_id: Uuid,
    filter: &CourseFilter,
) -> Result<Vec<RecommendedCourse>, AppError> {
    Ok(store.course_recommendations(user_id, filter).await?)
}
