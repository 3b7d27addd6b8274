use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::ingest::kind::CandidateRecord;
use crate::ingest::validate::ValidationError;

/// Where the records handed back to the caller came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Model,
    Fallback,
}

/// Why the model output could not be used.
#[derive(Debug, Error)]
pub enum FallbackReason {
    #[error("generation timed out")]
    Timeout,

    #[error("model returned no content")]
    EmptyResponse,

    #[error("no JSON payload found in model output")]
    NoPayload,

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// Returns the vetted substitute set for `R`. Never empty.
pub fn synthesize<R: CandidateRecord>(reason: &FallbackReason) -> Vec<R> {
    let records = R::fallback();
    warn!(
        "Using {} fallback {} records: {reason}",
        records.len(),
        R::KIND
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ats::record::AnalysisRecord;
    use crate::courses::record::CourseRecord;
    use crate::ingest::kind::MAX_RECORDS;
    use crate::ingest::validate::validate;
    use crate::jobs::record::JobRecord;
    use crate::recruiter::record::CandidateQuery;

    /// Each fallback set must be non-empty, bounded, and pass the same validation
    /// the model output goes through.
    fn assert_conforms<R: CandidateRecord>() {
        let records = synthesize::<R>(&FallbackReason::NoPayload);
        assert!(!records.is_empty(), "{} fallback is empty", R::KIND);
        assert!(records.len() <= MAX_RECORDS);

        let text = match R::KIND.shape() {
            crate::ingest::kind::Shape::Array => serde_json::to_string(&records).unwrap(),
            crate::ingest::kind::Shape::Object => serde_json::to_string(&records[0]).unwrap(),
        };
        let revalidated = validate::<R>(&text).unwrap();
        assert_eq!(revalidated.len(), records.len().min(MAX_RECORDS));
    }

    #[test]
    fn test_fallback_sets_conform_for_every_kind() {
        assert_conforms::<CourseRecord>();
        assert_conforms::<JobRecord>();
        assert_conforms::<AnalysisRecord>();
        assert_conforms::<CandidateQuery>();
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a: Vec<CourseRecord> = synthesize(&FallbackReason::Timeout);
        let b: Vec<CourseRecord> = synthesize(&FallbackReason::EmptyResponse);
        let titles = |v: &[CourseRecord]| v.iter().map(|c| c.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&a), titles(&b));
    }
}
