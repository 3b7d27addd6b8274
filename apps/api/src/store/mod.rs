//! Persistent store behind the ingestion pipeline.
//!
//! Every write is an upsert keyed by a unique constraint, so repeated pipeline runs
//! converge on the same rows. `AppState` carries an `Arc<dyn CareerStore>`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::ats::record::AnalysisRecord;
use crate::courses::record::CourseRecord;
use crate::ingest::identity::DerivedId;
use crate::ingest::score::{AssociationKind, Recommendation};
use crate::jobs::record::{JobRecord, JobType};
use crate::models::analysis::AnalysisRow;
use crate::models::association::AssociationRow;
use crate::models::course::{CourseFilter, CourseRow, RecommendedCourse};
use crate::models::job::{JobRow, MatchedJob};
use crate::models::profile::UserProfile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A create raced with another writer on the same unique key.
    #[error("duplicate key: {0}")]
    Conflict(String),

    /// The store rejected this record. Other records in the batch are unaffected.
    #[error("record rejected by store: {0}")]
    Constraint(String),

    /// The store cannot be reached or is not serving requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the current invocation must stop instead of moving on to the next record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db)
                if db.is_check_violation() || db.is_foreign_key_violation() =>
            {
                StoreError::Constraint(db.message().to_string())
            }
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // class 22: data exception, class 23: integrity constraint violation
                Some(code) if code.starts_with("22") || code.starts_with("23") => {
                    StoreError::Constraint(db.message().to_string())
                }
                _ => StoreError::Unavailable(err.to_string()),
            },
            sqlx::Error::RowNotFound
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => StoreError::Constraint(err.to_string()),
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

#[async_trait]
pub trait CareerStore: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    /// Profiles whose bio or industry contains `query`, case-insensitively.
    async fn search_profiles(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserProfile>, StoreError>;

    async fn upsert_course(
        &self,
        id: &DerivedId,
        course: &CourseRecord,
    ) -> Result<CourseRow, StoreError>;

    async fn upsert_job(&self, id: &DerivedId, job: &JobRecord) -> Result<JobRow, StoreError>;

    async fn upsert_analysis(
        &self,
        user_id: Uuid,
        file_key: &DerivedId,
        file_name: &str,
        analysis: &AnalysisRecord,
    ) -> Result<AnalysisRow, StoreError>;

    async fn upsert_association(
        &self,
        kind: AssociationKind,
        user_id: Uuid,
        entity_id: &str,
        recommendation: &Recommendation,
    ) -> Result<AssociationRow, StoreError>;

    /// Highest score first.
    async fn course_recommendations(
        &self,
        user_id: Uuid,
        filter: &CourseFilter,
    ) -> Result<Vec<RecommendedCourse>, StoreError>;

    /// Highest score first.
    async fn job_matches(
        &self,
        user_id: Uuid,
        job_type: Option<JobType>,
    ) -> Result<Vec<MatchedJob>, StoreError>;

    /// Most recently updated first.
    async fn analyses_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AnalysisRow>, StoreError>;
}
