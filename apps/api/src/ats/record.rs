use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ingest::fields::{Fields, Rejection, Vocabulary};
use crate::ingest::identity::{derive, DerivedId};
use crate::ingest::kind::{CandidateRecord, RecordKind};
use crate::ingest::reconcile::{IngestContext, Reconcile};
use crate::ingest::score::Score;
use crate::models::analysis::AnalysisRow;
use crate::store::{CareerStore, StoreError};

/// File name assumed when the caller does not name the analyzed document.
pub const DEFAULT_FILE_NAME: &str = "resume";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Error,
    #[default]
    Warning,
    Success,
}

impl Vocabulary for IssueType {
    const VARIANTS: &'static [Self] = &[IssueType::Error, IssueType::Warning, IssueType::Success];

    fn label(self) -> &'static str {
        match self {
            IssueType::Error => "error",
            IssueType::Warning => "warning",
            IssueType::Success => "success",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            IssueType::Error => &["critical", "fail", "failure"],
            IssueType::Warning => &["warn", "info"],
            IssueType::Success => &["ok", "pass", "good"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsIssue {
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub message: String,
}

/// ATS compatibility analysis of a resume, after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub score: Score,
    pub issues: Vec<AtsIssue>,
    pub suggestions: Vec<String>,
}

impl CandidateRecord for AnalysisRecord {
    const KIND: RecordKind = RecordKind::Analysis;

    fn from_fields(fields: &Fields<'_>) -> Result<Self, Rejection> {
        let score = Score::from_model(fields.require_f64("score")?)
            .ok_or(Rejection::Invalid { field: "score" })?;

        let issues = fields
            .objects("issues")
            .into_iter()
            .filter_map(|issue| {
                let issue = Fields::new(issue).ok()?;
                Some(AtsIssue {
                    kind: issue.choice("type"),
                    message: issue.text("message")?,
                })
            })
            .collect();

        Ok(Self {
            score,
            issues,
            suggestions: fields.list("suggestions"),
        })
    }

    fn fallback() -> Vec<Self> {
        vec![AnalysisRecord {
            score: Score::new(75),
            issues: vec![AtsIssue {
                kind: IssueType::Warning,
                message: "Could not fully analyze resume structure".to_string(),
            }],
            suggestions: vec![
                "Ensure your resume uses standard section headers".to_string(),
                "Include contact information at the top".to_string(),
                "Use bullet points for achievements".to_string(),
            ],
        }]
    }
}

/// Analyses are owned by a user and keyed by the document they were run on,
/// so re-analyzing the same file replaces the earlier result.
#[async_trait]
impl Reconcile for AnalysisRecord {
    type Entity = AnalysisRow;

    fn natural_key(&self, ctx: &IngestContext) -> DerivedId {
        derive(ctx.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME))
    }

    fn label(&self) -> &str {
        "ats analysis"
    }

    async fn upsert(
        &self,
        store: &dyn CareerStore,
        ctx: &IngestContext,
        key: &DerivedId,
    ) -> Result<AnalysisRow, StoreError> {
        let file_name = ctx.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME);
        store
            .upsert_analysis(ctx.user_id, key, file_name, self)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::validate::validate;

    #[test]
    fn test_issues_are_normalized_and_filtered() {
        let text = r#"{
            "score": "68",
            "issues": [
                {"type": "ERROR", "message": "Missing contact section"},
                {"type": "note", "message": "Tables detected"},
                {"type": "success", "message": ""},
                "stray string"
            ],
            "suggestions": ["Add a skills section"]
        }"#;
        let analysis = validate::<AnalysisRecord>(text).unwrap().remove(0);
        assert_eq!(analysis.score.value(), 68);
        assert_eq!(analysis.issues.len(), 2);
        assert_eq!(analysis.issues[0].kind, IssueType::Error);
        assert_eq!(analysis.issues[1].kind, IssueType::Warning);
        assert_eq!(analysis.suggestions, vec!["Add a skills section"]);
    }

    #[test]
    fn test_missing_score_fails_validation() {
        assert!(validate::<AnalysisRecord>(r#"{"issues": [], "suggestions": []}"#).is_err());
        assert!(validate::<AnalysisRecord>(r#"{"score": "excellent"}"#).is_err());
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let analysis = validate::<AnalysisRecord>(r#"{"score": 140}"#).unwrap().remove(0);
        assert_eq!(analysis.score.value(), 100);
        assert!(analysis.issues.is_empty());
    }
}
