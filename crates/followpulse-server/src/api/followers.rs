use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use followpulse_core::{Handle, HistorySnapshot, ProfileRecord};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct UsernameParams {
    username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TrackResponse {
    success: bool,
    profile: ProfileRecord,
    previous_followers: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryResponse {
    success: bool,
    username: Handle,
    history: Vec<HistorySnapshot>,
}

pub(super) async fn get_followers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<UsernameParams>,
) -> Result<Json<TrackResponse>, ApiError> {
    track(&state, &req_id, params.username.as_deref()).await
}

pub(super) async fn post_followers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<UsernameParams>, JsonRejection>,
) -> Result<Json<TrackResponse>, ApiError> {
    let Json(params) = payload.map_err(|rejection| {
        tracing::debug!(request_id = %req_id.0, error = %rejection, "rejected request body");
        ApiError::bad_request("Invalid JSON body")
    })?;
    track(&state, &req_id, params.username.as_deref()).await
}

pub(super) async fn get_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<UsernameParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let handle = parse_handle(params.username.as_deref())?;
    let history = state
        .recorder
        .store()
        .history(&handle)
        .await
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, handle = %handle, error = %e, "history read failed");
            ApiError::internal()
        })?;

    Ok(Json(HistoryResponse {
        success: true,
        username: handle,
        history,
    }))
}

/// Resolve through the fallback chain, then record. Persistence problems
/// never fail the request.
async fn track(
    state: &AppState,
    req_id: &RequestId,
    raw_username: Option<&str>,
) -> Result<Json<TrackResponse>, ApiError> {
    let handle = parse_handle(raw_username)?;

    let profile = state.resolver.resolve(&handle).await.map_err(|e| {
        tracing::warn!(request_id = %req_id.0, handle = %handle, error = %e, "profile not found");
        ApiError::bad_request(e.to_string())
    })?;

    let outcome = state.recorder.record(&handle, &profile).await;
    if !outcome.persisted {
        tracing::warn!(request_id = %req_id.0, handle = %handle, "follower snapshot not persisted");
    }

    Ok(Json(TrackResponse {
        success: true,
        profile,
        previous_followers: outcome.previous_follower_count,
    }))
}

fn parse_handle(raw: Option<&str>) -> Result<Handle, ApiError> {
    Handle::parse(raw.unwrap_or_default()).map_err(|e| ApiError::bad_request(e.to_string()))
}
