use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomFood {
    pub id: Uuid,
    pub description: String,
    pub ingredients: Vec<String>,
    pub serving_size: String,
    pub nutrients: serde_json::Value,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequest {
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub serving_size: Option<String>,
    #[serde(default)]
    pub nutrients: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}
