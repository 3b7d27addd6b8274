use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Career profile of a user, owned by the account service; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub industry: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<i32>,
    pub created_at: DateTime<Utc>,
}
