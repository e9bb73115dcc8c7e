use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    services::{NutritionClient, ResponseCache},
    store::Store,
};

pub mod auth;
pub mod foods;
pub mod health;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub cache: Arc<ResponseCache>,
    pub nutrition: Arc<NutritionClient>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let cache = Arc::new(ResponseCache::new());
        let nutrition = Arc::new(NutritionClient::new(&config.fdc_base_url, &config.fdc_api_key));
        let jwt = Arc::new(JwtService::new(&config.jwt_secret, config.token_ttl_hours));

        Self {
            store,
            config,
            cache,
            nutrition,
            jwt,
        }
    }
}
