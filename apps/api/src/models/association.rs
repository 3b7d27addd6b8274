use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user ↔ entity recommendation. At most one per (user_id, entity_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssociationRow {
    pub user_id: Uuid,
    pub entity_id: String,
    pub score: i16,
    pub score_estimated: bool,
    pub reasons: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
