use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;

use crate::{
    errors::{AppError, Result},
    handlers::AppState,
    middleware::auth::AuthenticatedUser,
    models::{CreateFoodRequest, SearchQuery},
    store::Store,
};

pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Query parameter 'query' is required".to_string()))?
        .to_string();

    let ttl = Duration::from_secs(state.config.cache_ttl_secs);
    let cache_key = format!("search:{}", query);
    let nutrition = state.nutrition.clone();

    let data = state
        .cache
        .get_or_compute(&cache_key, ttl, || async move {
            nutrition.search_foods(&query).await
        })
        .await?;

    Ok(Json(data))
}

pub async fn food_details(
    State(state): State<AppState>,
    Path(fdc_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let ttl = Duration::from_secs(state.config.cache_ttl_secs);
    let cache_key = format!("food:{}", fdc_id);
    let nutrition = state.nutrition.clone();

    let data = state
        .cache
        .get_or_compute(&cache_key, ttl, || async move {
            nutrition.food_details(fdc_id).await
        })
        .await?;

    Ok(Json(data))
}

pub async fn add_user_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateFoodRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Field 'description' is required".to_string()))?;

    let serving_size = request
        .serving_size
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Field 'servingSize' is required".to_string()))?;

    let nutrients = if request.nutrients.is_null() {
        json!({})
    } else {
        request.nutrients
    };

    let food = state
        .store
        .create_food(
            user.id,
            description,
            &request.ingredients,
            serving_size,
            &nutrients,
        )
        .await?;

    tracing::info!(food_id = %food.id, user_id = %user.id, "added custom food");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Food item added successfully!",
            "id": food.id
        })),
    ))
}
