use std::str::FromStr;

use axum::extract::{Query, State};
use axum::http::{Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use verdant_core::Data;
use verdant_core::service::{SubmitError, SubmitRequest, submit_entry};
use verdant_database::impls::entries;
use verdant_database::model::entry::{Domain, Entry, UsageCounts};

use crate::error::ApiError;

pub fn router(data: Data) -> Router {
    // Browser clients call these endpoints cross-origin, so preflights are
    // answered with allow-all headers.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // The three feedback endpoints share one contract and one handler; the
    // submitted category alone drives prompt and storage.
    Router::new()
        .route("/api/health", get(health))
        .route("/functions/v1/energy-feedback", post(feedback))
        .route("/functions/v1/water-feedback", post(feedback))
        .route("/functions/v1/waste-feedback", post(feedback))
        .route("/api/entries", get(list_entries))
        .route("/api/usage", get(usage_counts))
        .layer(cors)
        .with_state(data)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Serialize)]
struct FeedbackResponse {
    feedback: String,
}

/// POST /functions/v1/{energy,water,waste}-feedback
///
/// The body is taken as a raw string so that an unparseable payload maps to
/// the contract's malformed-request error rather than a framework rejection.
async fn feedback(
    State(data): State<Data>,
    body: String,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let request: SubmitRequest =
        serde_json::from_str(&body).map_err(SubmitError::MalformedRequest)?;

    let outcome = submit_entry(&data.db, data.llm.as_ref(), request).await?;

    Ok(Json(FeedbackResponse {
        feedback: outcome.feedback,
    }))
}

#[derive(Deserialize)]
struct UserQuery {
    user_id: Option<String>,
    domain: Option<String>,
}

/// GET /api/entries?user_id=&domain= — newest first.
async fn list_entries(
    State(data): State<Data>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let user_id = require_user_id(query.user_id)?;
    let domain = match query.domain {
        Some(raw) => Some(Domain::from_str(&raw).map_err(|_| ApiError::UnknownDomain(raw))?),
        None => None,
    };

    let entries = entries::list_entries_for_user(&data.db, &user_id, domain).await?;
    Ok(Json(entries))
}

/// GET /api/usage?user_id= — aggregate per-domain counts.
async fn usage_counts(
    State(data): State<Data>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UsageCounts>, ApiError> {
    let user_id = require_user_id(query.user_id)?;

    let counts = entries::count_entries_by_domain(&data.db, &user_id).await?;
    Ok(Json(counts))
}

fn require_user_id(user_id: Option<String>) -> Result<String, ApiError> {
    user_id
        .filter(|value| !value.trim().is_empty())
        .ok_or(ApiError::MissingUserId)
}
