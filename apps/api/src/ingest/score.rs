//! Recommendation scorer: attaches a bounded relevance score and rationale to a
//! reconciled entity and upserts the (user, entity) association.
//!
//! Scores the model did not supply are estimated pseudo-randomly inside a fixed
//! band and flagged as estimated. They are not reproducible across calls.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::models::association::AssociationRow;
use crate::store::{CareerStore, StoreError};

pub const MAX_SCORE: u8 = 100;

/// Band used for match scores the model left out.
pub const ESTIMATED_MATCH_RANGE: RangeInclusive<u8> = 70..=99;

/// Relevance score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_SCORE))
    }

    /// Rounds and clamps a model-supplied number. Values on a 0..=1 scale are
    /// read as fractions, so 0.85 and 85 both mean 85.
    pub fn from_model(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        let scaled = if raw > 0.0 && raw <= 1.0 { raw * 100.0 } else { raw };
        Some(Self(scaled.round().clamp(0.0, MAX_SCORE as f64) as u8))
    }

    /// Best-effort estimate drawn uniformly from `range`.
    pub fn estimate(range: RangeInclusive<u8>) -> Self {
        Self::new(rand::thread_rng().gen_range(range))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// A score plus its provenance and rationale, ready to be attached to an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub score: Score,
    pub estimated: bool,
    pub reasons: Vec<String>,
}

impl Recommendation {
    /// Uses the model's score when present, otherwise an estimate in [`ESTIMATED_MATCH_RANGE`].
    pub fn new(model_score: Option<f64>, reasons: Vec<String>) -> Self {
        match model_score.and_then(Score::from_model) {
            Some(score) => Self {
                score,
                estimated: false,
                reasons,
            },
            None => Self {
                score: Score::estimate(ESTIMATED_MATCH_RANGE),
                estimated: true,
                reasons,
            },
        }
    }
}

/// Which association table a recommendation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    Course,
    Job,
}

/// Upserts the association for `(user_id, entity_id)`; the latest write wins.
pub async fn recommend(
    store: &dyn CareerStore,
    kind: AssociationKind,
    user_id: Uuid,
    entity_id: &str,
    recommendation: &Recommendation,
) -> Result<AssociationRow, StoreError> {
    let row = store
        .upsert_association(kind, user_id, entity_id, recommendation)
        .await?;
    debug!(
        "Scored {kind:?} {entity_id} for user {user_id}: {} (estimated: {})",
        row.score, row.score_estimated
    );
    Ok(row)
}
