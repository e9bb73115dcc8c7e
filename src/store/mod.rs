use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{CustomFood, UsageLogEntry, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Outcome of the quota gate's read-modify-write cycle. The backing store
/// applies refill and decrement as one atomic step so two concurrent requests
/// for the same user can never both observe the pre-decrement count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed { remaining: i32 },
    Exhausted,
    UnknownUser,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        initial_allowance: i32,
    ) -> Result<User>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Consume one API call for `user_id` at instant `now`. If the user's
    /// `last_reset` is at least `reset_window` old the counter is first
    /// refilled to `allowance`, then decremented, all in one step.
    async fn consume_api_call(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        allowance: i32,
        reset_window: Duration,
    ) -> Result<QuotaDecision>;

    /// Overwrite a user's quota counters directly, bypassing the gate.
    async fn set_quota_state(
        &self,
        user_id: Uuid,
        remaining: i32,
        last_reset: DateTime<Utc>,
    ) -> Result<()>;

    async fn log_api_usage(
        &self,
        user_id: Uuid,
        endpoint: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()>;

    async fn list_usage(&self, user_id: Uuid) -> Result<Vec<UsageLogEntry>>;

    async fn create_food(
        &self,
        created_by: Uuid,
        description: &str,
        ingredients: &[String],
        serving_size: &str,
        nutrients: &serde_json::Value,
    ) -> Result<CustomFood>;

    async fn ping(&self) -> Result<()>;
}
