//! Data freshness endpoint.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::queries::Queries;
use crate::error::StatsError;
use crate::routes::{AppState, RepoParams};
use crate::timefmt;

const STALE_AFTER_SECONDS: f64 = 86_400.0;
const OUTDATED_AFTER_SECONDS: f64 = 7.0 * 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FreshnessStatus {
    Fresh,
    Stale,
    Outdated,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataQualityResponse {
    pub repository: String,
    pub latest_event_time: DateTime<Utc>,
    pub time_since_latest_event: String,
    pub data_freshness_status: FreshnessStatus,
}

/// `GET /stats/data-quality`
///
/// Recency of the repository's newest event, with a coarse freshness
/// classification. A repository with no events at all is a 404.
pub async fn data_quality(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<RepoParams>,
) -> Result<Json<DataQualityResponse>, StatsError> {
    let row = Queries::latest_event(warehouse.pool(), &params.repo_name).await?;

    let latest = row.latest_event.ok_or_else(|| {
        StatsError::NotFound(format!(
            "No events found for repository: {}",
            params.repo_name
        ))
    })?;

    let seconds_since = (Utc::now() - latest).num_seconds().max(0) as f64;

    Ok(Json(DataQualityResponse {
        repository: params.repo_name,
        latest_event_time: latest,
        time_since_latest_event: timefmt::elapsed_phrase(Some(seconds_since)),
        data_freshness_status: classify_freshness(seconds_since),
    }))
}

/// Fresh under a day, stale through a week, outdated past that.
fn classify_freshness(seconds_since: f64) -> FreshnessStatus {
    if seconds_since < STALE_AFTER_SECONDS {
        FreshnessStatus::Fresh
    } else if seconds_since <= OUTDATED_AFTER_SECONDS {
        FreshnessStatus::Stale
    } else {
        FreshnessStatus::Outdated
    }
}
