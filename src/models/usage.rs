use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per successful pass through the quota gate. Append-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub user_id: Uuid,
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
}
