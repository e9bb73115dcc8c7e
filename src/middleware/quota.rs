use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::store::{QuotaDecision, Store};

/// Rolling window after which a user's allowance refills, not midnight-aligned.
const RESET_WINDOW_HOURS: i64 = 24;

/// Per-request gate on protected routes: refill the user's allowance if the
/// window has elapsed, consume one call, log the usage, and stamp the
/// remaining budget on the response. Refill and consumption happen as one
/// atomic store operation.
pub async fn quota_gate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let now = Utc::now();
    let allowance = state.config.daily_call_allowance;

    let decision = state
        .store
        .consume_api_call(user.id, now, allowance, Duration::hours(RESET_WINDOW_HOURS))
        .await
        .map_err(|e| e.into_response())?;

    let remaining = match decision {
        QuotaDecision::Allowed { remaining } => remaining,
        QuotaDecision::Exhausted => {
            tracing::info!(user_id = %user.id, "rate limit exceeded");
            return Err(AppError::RateLimitExceeded.into_response());
        }
        QuotaDecision::UnknownUser => return Err(AppError::UnknownUser.into_response()),
    };

    let endpoint = request.uri().path().to_string();
    state
        .store
        .log_api_usage(user.id, &endpoint, now)
        .await
        .map_err(|e| e.into_response())?;

    request.extensions_mut().insert(user);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("X-Quota-Remaining", remaining.to_string().parse().unwrap());
    headers.insert("X-Quota-Limit", allowance.to_string().parse().unwrap());

    Ok(response)
}
