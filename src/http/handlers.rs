use axum::extract::State;
use axum::http::{header, HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::credentials::resolve_api_key;
use super::error::ApiError;
use super::AppState;
use crate::board::pipeline::build_snapshot;
use crate::config::ResponseShape;
use crate::model::board::Snapshot;

#[derive(Serialize)]
#[serde(untagged)]
pub enum SnapshotBody<'a> {
    TopLevel(&'a Snapshot),
    MergeVariables { merge_variables: &'a Snapshot },
}

impl<'a> SnapshotBody<'a> {
    pub fn new(snapshot: &'a Snapshot, shape: ResponseShape) -> Self {
        match shape {
            ResponseShape::TopLevel => SnapshotBody::TopLevel(snapshot),
            ResponseShape::MergeVariables => SnapshotBody::MergeVariables {
                merge_variables: snapshot,
            },
        }
    }
}

pub fn cache_control(max_age_secs: u64) -> String {
    format!("s-maxage={max_age_secs}, stale-while-revalidate")
}

/// Any method on /api/linear-issues. Only GET does work.
pub async fn linear_issues(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }
    let api_key =
        resolve_api_key(&headers, state.fallback_api_key.as_deref()).ok_or(ApiError::Unauthorized)?;

    let tracker = state.trackers.connect(&api_key);
    let snapshot = build_snapshot(tracker.as_ref(), Utc::now())
        .await
        .map_err(ApiError::Upstream)?;
    info!(total = snapshot.total_count, "serving snapshot");

    Ok((
        [(header::CACHE_CONTROL, cache_control(state.cache_max_age_secs))],
        Json(SnapshotBody::new(&snapshot, state.shape)),
    )
        .into_response())
}

pub async fn health() -> &'static str {
    "ok"
}
