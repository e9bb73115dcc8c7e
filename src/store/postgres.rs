use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{CustomFood, UsageLogEntry, User};
use crate::store::{QuotaDecision, Store};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Migration failed: {}", e)))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        initial_allowance: i32,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, api_calls_remaining)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, plan, api_calls_remaining, last_reset, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(initial_allowance)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateUser,
            _ => AppError::Database(e),
        })?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, plan, api_calls_remaining, last_reset, created_at \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, plan, api_calls_remaining, last_reset, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn consume_api_call(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        allowance: i32,
        reset_window: Duration,
    ) -> Result<QuotaDecision> {
        let cutoff = now - reset_window;

        // Refill and decrement in one conditional statement; row-level
        // atomicity linearizes concurrent requests for the same user.
        let row = sqlx::query(
            r#"
            UPDATE users
            SET api_calls_remaining =
                    (CASE WHEN last_reset <= $2 THEN $3 ELSE api_calls_remaining END) - 1,
                last_reset = CASE WHEN last_reset <= $2 THEN $1 ELSE last_reset END
            WHERE id = $4
              AND (last_reset <= $2 OR api_calls_remaining > 0)
            RETURNING api_calls_remaining
            "#,
        )
        .bind(now)
        .bind(cutoff)
        .bind(allowance)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(QuotaDecision::Allowed {
                remaining: row.try_get("api_calls_remaining")?,
            }),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await?;

                if exists {
                    Ok(QuotaDecision::Exhausted)
                } else {
                    Ok(QuotaDecision::UnknownUser)
                }
            }
        }
    }

    async fn set_quota_state(
        &self,
        user_id: Uuid,
        remaining: i32,
        last_reset: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE users SET api_calls_remaining = $1, last_reset = $2 WHERE id = $3")
            .bind(remaining)
            .bind(last_reset)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn log_api_usage(
        &self,
        user_id: Uuid,
        endpoint: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("INSERT INTO api_usage (user_id, endpoint, timestamp) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(endpoint)
            .bind(timestamp)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_usage(&self, user_id: Uuid) -> Result<Vec<UsageLogEntry>> {
        let entries = sqlx::query_as::<_, UsageLogEntry>(
            "SELECT user_id, endpoint, timestamp FROM api_usage \
             WHERE user_id = $1 ORDER BY timestamp",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn create_food(
        &self,
        created_by: Uuid,
        description: &str,
        ingredients: &[String],
        serving_size: &str,
        nutrients: &serde_json::Value,
    ) -> Result<CustomFood> {
        let food = sqlx::query_as::<_, CustomFood>(
            r#"
            INSERT INTO user_foods (description, ingredients, serving_size, nutrients, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, description, ingredients, serving_size, nutrients, created_by, created_at
            "#,
        )
        .bind(description)
        .bind(ingredients)
        .bind(serving_size)
        .bind(nutrients)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(food)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
