use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Access tokens expire this many hours after issuance.
    pub token_ttl_hours: i64,
    /// Authorized calls allowed per user per rolling 24h window.
    pub daily_call_allowance: i32,
    /// Seconds a proxied upstream response stays cached.
    pub cache_ttl_secs: u64,
    pub fdc_api_key: String,
    pub fdc_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/nutrition_gateway".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key".to_string()),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()?,
            daily_call_allowance: env::var("DAILY_CALL_ALLOWANCE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string()) // 5 minutes
                .parse()?,
            fdc_api_key: env::var("FDC_API_KEY").unwrap_or_default(),
            fdc_base_url: env::var("FDC_BASE_URL")
                .unwrap_or_else(|_| "https://api.nal.usda.gov/fdc/v1".to_string()),
        })
    }
}
