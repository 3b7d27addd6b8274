//! Upsert reconciler: writes each validated record to the store by its derived
//! natural key, so re-running the pipeline updates rows instead of duplicating them.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ingest::identity::DerivedId;
use crate::ingest::kind::CandidateRecord;
use crate::ingest::score::{AssociationKind, Recommendation};
use crate::store::{CareerStore, StoreError};

/// Who the records are being ingested for.
#[derive(Debug, Clone)]
pub struct IngestContext {
    pub user_id: Uuid,
    /// Source document name, for kinds keyed by the file they were derived from.
    pub file_name: Option<String>,
}

impl IngestContext {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            file_name: None,
        }
    }

    pub fn with_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A record kind that is persisted as an entity.
#[async_trait]
pub trait Reconcile: CandidateRecord {
    type Entity: Clone + std::fmt::Debug + Send + Sync;

    /// Stable key used as the upsert target.
    fn natural_key(&self, ctx: &IngestContext) -> DerivedId;

    /// Human-readable label for logs and failure reports.
    fn label(&self) -> &str;

    async fn upsert(
        &self,
        store: &dyn CareerStore,
        ctx: &IngestContext,
        key: &DerivedId,
    ) -> Result<Self::Entity, StoreError>;

    /// The user association to record for this entity, if the kind has one.
    fn association(&self) -> Option<(AssociationKind, Recommendation)> {
        None
    }
}

/// A record that could not be persisted. The rest of its batch is unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    pub key: String,
    pub label: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Reconciled<R: Reconcile> {
    pub id: DerivedId,
    pub record: R,
    pub entity: R::Entity,
}

#[derive(Debug)]
pub struct BatchResult<R: Reconcile> {
    pub persisted: Vec<Reconciled<R>>,
    pub failures: Vec<RecordFailure>,
}

/// Upserts every record independently.
///
/// A duplicate-key race is retried once. A rejected record is reported and skipped.
/// An unavailable store aborts the batch with `Err`.
pub async fn reconcile_batch<R: Reconcile>(
    store: &dyn CareerStore,
    ctx: &IngestContext,
    records: Vec<R>,
) -> Result<BatchResult<R>, StoreError> {
    let mut persisted: Vec<Reconciled<R>> = Vec::with_capacity(records.len());
    let mut failures = Vec::new();

    for record in records {
        let key = record.natural_key(ctx);
        if key.is_empty() {
            warn!("Skipping {} '{}': no usable identifier", R::KIND, record.label());
            failures.push(RecordFailure {
                key: String::new(),
                label: record.label().to_string(),
                reason: "natural key is empty".to_string(),
            });
            continue;
        }
        if persisted.iter().any(|p| p.id == key) {
            debug!("Skipping duplicate {} {key} within batch", R::KIND);
            continue;
        }

        match upsert_with_retry(store, ctx, &record, &key).await {
            Ok(entity) => {
                debug!("Reconciled {} {key}", R::KIND);
                persisted.push(Reconciled {
                    id: key,
                    record,
                    entity,
                });
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!("Failed to persist {} {key}: {err}", R::KIND);
                failures.push(RecordFailure {
                    key: key.into_inner(),
                    label: record.label().to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(BatchResult {
        persisted,
        failures,
    })
}

async fn upsert_with_retry<R: Reconcile>(
    store: &dyn CareerStore,
    ctx: &IngestContext,
    record: &R,
    key: &DerivedId,
) -> Result<R::Entity, StoreError> {
    match record.upsert(store, ctx, key).await {
        Err(StoreError::Conflict(detail)) => {
            debug!("Conflict on {} {key} ({detail}), retrying as update", R::KIND);
            record.upsert(store, ctx, key).await
        }
        other => other,
    }
}
