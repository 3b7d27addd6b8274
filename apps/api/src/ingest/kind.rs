use serde::Serialize;

use crate::ingest::fields::{Fields, Rejection};

/// Upper bound on records accepted from a single model response.
pub const MAX_RECORDS: usize = 6;

/// Top-level JSON shape a record kind is expected to arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    Object,
}

impl Shape {
    pub fn brackets(self) -> (char, char) {
        match self {
            Shape::Array => ('[', ']'),
            Shape::Object => ('{', '}'),
        }
    }
}

/// The record kinds handled by the shared ingestion pipeline.
///
/// Each kind carries its pipeline configuration: expected shape and the
/// minimal set of fields a record must carry to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Course,
    Job,
    Analysis,
    CandidateQuery,
}

impl RecordKind {
    pub fn shape(self) -> Shape {
        match self {
            RecordKind::Course | RecordKind::Job => Shape::Array,
            RecordKind::Analysis | RecordKind::CandidateQuery => Shape::Object,
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            RecordKind::Course => &["title", "provider", "description", "category"],
            RecordKind::Job => &["title", "company", "description"],
            RecordKind::Analysis => &["score"],
            RecordKind::CandidateQuery => &["requiredSkills"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Course => "course",
            RecordKind::Job => "job",
            RecordKind::Analysis => "analysis",
            RecordKind::CandidateQuery => "candidate_query",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed record the model is asked to produce.
///
/// Implementors coerce a loosely-typed JSON object into `Self` and supply the
/// vetted fallback set used when the model output is unusable.
pub trait CandidateRecord: Sized + Clone + Serialize + Send + Sync + 'static {
    const KIND: RecordKind;

    /// Builds a record from an object whose required fields are already known to be present.
    fn from_fields(fields: &Fields<'_>) -> Result<Self, Rejection>;

    /// Non-empty, hand-authored substitute set for this kind.
    fn fallback() -> Vec<Self>;
}
