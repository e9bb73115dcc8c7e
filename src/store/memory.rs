use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{CustomFood, SubscriptionPlan, UsageLogEntry, User};
use crate::store::{QuotaDecision, Store};

/// In-memory backend used by the test suite and local development. A single
/// mutex around the whole state gives the same per-user serialization the
/// Postgres backend gets from its conditional UPDATE.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    usage: Vec<UsageLogEntry>,
    foods: HashMap<Uuid, CustomFood>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        initial_allowance: i32,
    ) -> Result<User> {
        let mut inner = self.inner.lock().await;

        if inner.users.values().any(|u| u.username == username) {
            return Err(AppError::DuplicateUser);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            plan: SubscriptionPlan::Free,
            api_calls_remaining: initial_allowance,
            last_reset: now,
            created_at: now,
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn consume_api_call(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        allowance: i32,
        reset_window: Duration,
    ) -> Result<QuotaDecision> {
        let mut inner = self.inner.lock().await;

        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(QuotaDecision::UnknownUser);
        };

        // Refill before the consumption check, matching the Postgres UPDATE.
        if now - user.last_reset >= reset_window {
            user.api_calls_remaining = allowance;
            user.last_reset = now;
        }

        if user.api_calls_remaining <= 0 {
            return Ok(QuotaDecision::Exhausted);
        }

        user.api_calls_remaining -= 1;
        Ok(QuotaDecision::Allowed {
            remaining: user.api_calls_remaining,
        })
    }

    async fn set_quota_state(
        &self,
        user_id: Uuid,
        remaining: i32,
        last_reset: DateTime<Utc>,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.api_calls_remaining = remaining;
            user.last_reset = last_reset;
        }
        Ok(())
    }

    async fn log_api_usage(
        &self,
        user_id: Uuid,
        endpoint: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.usage.push(UsageLogEntry {
            user_id,
            endpoint: endpoint.to_string(),
            timestamp,
        });
        Ok(())
    }

    async fn list_usage(&self, user_id: Uuid) -> Result<Vec<UsageLogEntry>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .usage
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_food(
        &self,
        created_by: Uuid,
        description: &str,
        ingredients: &[String],
        serving_size: &str,
        nutrients: &serde_json::Value,
    ) -> Result<CustomFood> {
        let mut inner = self.inner.lock().await;
        let food = CustomFood {
            id: Uuid::new_v4(),
            description: description.to_string(),
            ingredients: ingredients.to_vec(),
            serving_size: serving_size.to_string(),
            nutrients: nutrients.clone(),
            created_by,
            created_at: Utc::now(),
        };
        inner.foods.insert(food.id, food.clone());

        Ok(food)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
