//! Drives one ingestion: generate → sanitize → validate (or fall back) →
//! reconcile → score. Model output never reaches the store unvalidated.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::ingest::fallback::{synthesize, FallbackReason, RecordSource};
use crate::ingest::identity::DerivedId;
use crate::ingest::kind::CandidateRecord;
use crate::ingest::reconcile::{reconcile_batch, IngestContext, Reconcile, RecordFailure};
use crate::ingest::sanitize::sanitize;
use crate::ingest::score::{recommend, Recommendation};
use crate::ingest::validate::validate;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmError, TextGenerator};
use crate::store::{CareerStore, StoreError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("text generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Model output, or the reason there is none to use.
#[derive(Debug)]
pub enum Generated {
    Text(String),
    Missing(FallbackReason),
}

/// Validated records and where they came from. `records` is never empty.
#[derive(Debug, Clone)]
pub struct Extracted<R> {
    pub records: Vec<R>,
    pub source: RecordSource,
}

/// Turns raw model text into records of kind `R`, substituting the fallback set
/// when the text yields nothing usable.
pub fn extract<R: CandidateRecord>(raw: &str) -> Extracted<R> {
    let outcome = sanitize(raw, R::KIND.shape())
        .ok_or(FallbackReason::NoPayload)
        .and_then(|text| validate::<R>(&text).map_err(FallbackReason::from));

    match outcome {
        Ok(records) => Extracted {
            records,
            source: RecordSource::Model,
        },
        Err(reason) => fallback(reason),
    }
}

fn fallback<R: CandidateRecord>(reason: FallbackReason) -> Extracted<R> {
    Extracted {
        records: synthesize::<R>(&reason),
        source: RecordSource::Fallback,
    }
}

#[derive(Debug, Serialize)]
pub struct IngestedRecord<R: Reconcile> {
    pub id: DerivedId,
    #[serde(flatten)]
    pub record: R,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(skip)]
    pub entity: R::Entity,
}

#[derive(Debug, Serialize)]
pub struct IngestOutcome<R: Reconcile> {
    pub source: RecordSource,
    pub records: Vec<IngestedRecord<R>>,
    pub failures: Vec<RecordFailure>,
}

pub struct Pipeline<'a> {
    generator: &'a dyn TextGenerator,
    store: &'a dyn CareerStore,
    timeout: Duration,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        generator: &'a dyn TextGenerator,
        store: &'a dyn CareerStore,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            store,
            timeout,
        }
    }

    /// One bounded generation call. A timeout or blank reply is `Missing`;
    /// any other generation failure is returned as an error.
    pub async fn generate(&self, prompt: &str) -> Result<Generated, LlmError> {
        let call = self.generator.generate(prompt, JSON_ONLY_SYSTEM);
        match tokio::time::timeout(self.timeout, call).await {
            Err(_) => {
                warn!("Generation timed out after {}s", self.timeout.as_secs());
                Ok(Generated::Missing(FallbackReason::Timeout))
            }
            Ok(Err(LlmError::EmptyContent)) => {
                Ok(Generated::Missing(FallbackReason::EmptyResponse))
            }
            Ok(Err(e)) => Err(e),
            Ok(Ok(text)) => Ok(Generated::Text(text)),
        }
    }

    /// Generates and extracts without touching the store.
    pub async fn records<R: CandidateRecord>(
        &self,
        prompt: &str,
    ) -> Result<Extracted<R>, LlmError> {
        Ok(match self.generate(prompt).await? {
            Generated::Text(raw) => extract::<R>(&raw),
            Generated::Missing(reason) => fallback::<R>(reason),
        })
    }

    /// Full ingestion for `ctx`: every persisted record comes back with its
    /// derived id and, for kinds with a user association, its recommendation.
    pub async fn run<R: Reconcile>(
        &self,
        prompt: &str,
        ctx: &IngestContext,
    ) -> Result<IngestOutcome<R>, PipelineError> {
        let extracted = self.records::<R>(prompt).await?;
        let batch = reconcile_batch(self.store, ctx, extracted.records).await?;
        let mut failures = batch.failures;
        let mut records = Vec::with_capacity(batch.persisted.len());

        for reconciled in batch.persisted {
            let recommendation = match reconciled.record.association() {
                None => None,
                Some((kind, recommendation)) => {
                    let id = reconciled.id.as_str();
                    match recommend(self.store, kind, ctx.user_id, id, &recommendation).await {
                        Ok(_) => Some(recommendation),
                        Err(err) if err.is_fatal() => return Err(err.into()),
                        Err(err) => {
                            warn!("Failed to record {kind:?} association {id}: {err}");
                            failures.push(RecordFailure {
                                key: id.to_string(),
                                label: reconciled.record.label().to_string(),
                                reason: err.to_string(),
                            });
                            None
                        }
                    }
                }
            };
            records.push(IngestedRecord {
                id: reconciled.id,
                record: reconciled.record,
                recommendation,
                entity: reconciled.entity,
            });
        }

        info!(
            "Ingested {} {} records for user {} (source: {:?}, failures: {})",
            records.len(),
            R::KIND,
            ctx.user_id,
            extracted.source,
            failures.len()
        );

        Ok(IngestOutcome {
            source: extracted.source,
            records,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::ats::record::AnalysisRecord;
    use crate::courses::record::CourseRecord;
    use crate::ingest::score::AssociationKind;
    use crate::llm_client::fake::{CannedGenerator, StalledGenerator};
    use crate::store::memory::InMemoryStore;

    const TIMEOUT: Duration = Duration::from_secs(30);

    const FENCED_SQL_COURSE: &str = "Here are my picks!\n```json\n[{\"title\": \"Intro to SQL\", \
        \"provider\": \"Acme\", \"description\": \"Learn queries\", \"category\": \"Data\"}]\n```";

    #[test]
    fn test_extract_recovers_fenced_payload() {
        let extracted = extract::<CourseRecord>(FENCED_SQL_COURSE);
        assert_eq!(extracted.source, RecordSource::Model);
        assert_eq!(extracted.records.len(), 1);
        assert_eq!(extracted.records[0].title, "Intro to SQL");
    }

    #[test]
    fn test_extract_falls_back_on_refusal() {
        let extracted = extract::<CourseRecord>("Sorry, I cannot help with that.");
        assert_eq!(extracted.source, RecordSource::Fallback);
        assert!(!extracted.records.is_empty());
    }

    #[tokio::test]
    async fn test_reply_with_only_unkeyable_titles_falls_back() {
        let store = InMemoryStore::default();
        let generator = CannedGenerator::replying(
            r#"[{"title":"???","provider":"A","description":"d","category":"c"}]"#,
        );
        let pipeline = Pipeline::new(&generator, &store, TIMEOUT);
        let ctx = IngestContext::for_user(Uuid::new_v4());

        let outcome = pipeline.run::<CourseRecord>("prompt", &ctx).await.unwrap();

        assert_eq!(outcome.source, RecordSource::Fallback);
        assert_eq!(outcome.records.len(), CourseRecord::fallback().len());
        assert!(outcome.failures.is_empty());
    }

    #[tokio::test]
    async fn test_fenced_course_is_created_then_updated() {
        let store = InMemoryStore::default();
        let generator = CannedGenerator::replying(FENCED_SQL_COURSE);
        let pipeline = Pipeline::new(&generator, &store, TIMEOUT);
        let ctx = IngestContext::for_user(Uuid::new_v4());

        let first = pipeline.run::<CourseRecord>("prompt", &ctx).await.unwrap();
        assert_eq!(first.source, RecordSource::Model);
        assert_eq!(first.records.len(), 1);
        assert_eq!(first.records[0].id.as_str(), "intro-to-sql");
        let created_at = first.records[0].entity.created_at;

        let second = pipeline.run::<CourseRecord>("prompt", &ctx).await.unwrap();
        assert_eq!(second.records[0].entity.created_at, created_at);
        assert!(second.records[0].entity.updated_at >= first.records[0].entity.updated_at);
        assert_eq!(store.course_count(), 1);
        assert_eq!(store.association_count(AssociationKind::Course), 1);
    }

    #[tokio::test]
    async fn test_refusal_persists_fallback_set() {
        let store = InMemoryStore::default();
        let generator = CannedGenerator::replying("Sorry, I cannot help with that.");
        let pipeline = Pipeline::new(&generator, &store, TIMEOUT);

        let outcome = pipeline
            .run::<CourseRecord>("prompt", &IngestContext::for_user(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(outcome.source, RecordSource::Fallback);
        assert_eq!(outcome.records.len(), CourseRecord::fallback().len());
        assert_eq!(store.course_count(), outcome.records.len());
        assert!(outcome
            .records
            .iter()
            .all(|r| r.recommendation.as_ref().is_some_and(|rec| rec.estimated)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_generation_falls_back() {
        let store = InMemoryStore::default();
        let pipeline = Pipeline::new(&StalledGenerator, &store, TIMEOUT);

        let extracted = pipeline.records::<CourseRecord>("prompt").await.unwrap();

        assert_eq!(extracted.source, RecordSource::Fallback);
        assert!(!extracted.records.is_empty());
    }

    #[tokio::test]
    async fn test_blank_reply_falls_back() {
        let store = InMemoryStore::default();
        let generator = CannedGenerator::replying("   ");
        let pipeline = Pipeline::new(&generator, &store, TIMEOUT);

        let extracted = pipeline.records::<AnalysisRecord>("prompt").await.unwrap();

        assert_eq!(extracted.source, RecordSource::Fallback);
        assert_eq!(extracted.records[0].score.value(), 75);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_fatal() {
        let store = InMemoryStore::default();
        let generator = CannedGenerator::failing(401);
        let pipeline = Pipeline::new(&generator, &store, TIMEOUT);

        let err = pipeline
            .run::<CourseRecord>("prompt", &IngestContext::for_user(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Llm(LlmError::Api { status: 401, .. })));
        assert_eq!(store.course_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_fatal() {
        let store = InMemoryStore::default().unavailable();
        let generator = CannedGenerator::replying(FENCED_SQL_COURSE);
        let pipeline = Pipeline::new(&generator, &store, TIMEOUT);

        let err = pipeline
            .run::<CourseRecord>("prompt", &IngestContext::for_user(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Store(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_partial_batch_reports_failures() {
        let store = InMemoryStore::default().rejecting("broken");
        let generator = CannedGenerator::replying(
            r#"[
                {"title": "Intro to SQL", "provider": "A", "description": "d", "category": "Data"},
                {"title": "Broken", "provider": "A", "description": "d", "category": "Data"},
                {"title": "Rust Basics", "provider": "A", "description": "d", "category": "Programming", "matchScore": 93}
            ]"#,
        );
        let pipeline = Pipeline::new(&generator, &store, TIMEOUT);

        let outcome = pipeline
            .run::<CourseRecord>("prompt", &IngestContext::for_user(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].key, "broken");
        let rust = &outcome.records[1];
        let recommendation = rust.recommendation.as_ref().unwrap();
        assert_eq!(recommendation.score.value(), 93);
        assert!(!recommendation.estimated);
    }

    #[tokio::test]
    async fn test_outcome_serializes_records_flat() {
        let store = InMemoryStore::default();
        let generator = CannedGenerator::replying(FENCED_SQL_COURSE);
        let pipeline = Pipeline::new(&generator, &store, TIMEOUT);

        let outcome = pipeline
            .run::<CourseRecord>("prompt", &IngestContext::for_user(Uuid::new_v4()))
            .await
            .unwrap();
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["source"], "model");
        assert_eq!(value["records"][0]["id"], "intro-to-sql");
        assert_eq!(value["records"][0]["title"], "Intro to SQL");
        assert!(value["records"][0]["recommendation"]["score"].is_number());
    }
}
