//! Pull request outcome and latency endpoints.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::queries::Queries;
use crate::error::StatsError;
use crate::routes::{default_start_date, start_of_day, AppState, RepoParams};
use crate::timefmt;

#[derive(Debug, Clone, Serialize)]
pub struct PrSuccessRateResponse {
    pub repository: String,
    pub total_closed_prs: i64,
    pub merged_prs: i64,
    pub success_rate_percent: f64,
}

/// `GET /stats/prs/success-rate`
///
/// Share of closed PRs whose final state carried the merged flag.
pub async fn success_rate(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<RepoParams>,
) -> Result<Json<PrSuccessRateResponse>, StatsError> {
    let row = Queries::pr_success(warehouse.pool(), &params.repo_name).await?;

    if row.total_closed == 0 {
        return Err(StatsError::NotFound(format!(
            "No closed PRs found for repository: {}",
            params.repo_name
        )));
    }

    Ok(Json(PrSuccessRateResponse {
        repository: params.repo_name,
        total_closed_prs: row.total_closed,
        merged_prs: row.merged,
        success_rate_percent: success_rate_percent(row.merged, row.total_closed),
    }))
}

/// Merged share of closed PRs as a percentage, two decimal places.
fn success_rate_percent(merged: i64, total_closed: i64) -> f64 {
    let percent = merged as f64 * 100.0 / total_closed as f64;
    (percent * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClosingTimeParams {
    pub repo_name: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrAvgClosingTimeResponse {
    pub repository: String,
    pub average_closing_time_seconds: f64,
    pub average_closing_time_readable: String,
}

/// `GET /stats/prs/avg-closing-time`
///
/// Average time from PR opening to closing, merged or not.
pub async fn avg_closing_time(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<ClosingTimeParams>,
) -> Result<Json<PrAvgClosingTimeResponse>, StatsError> {
    let since = start_of_day(params.start_date.unwrap_or_else(default_start_date));

    let row = Queries::pr_closing_avg(warehouse.pool(), &params.repo_name, since).await?;

    let avg_seconds = row.avg_seconds.ok_or_else(|| {
        StatsError::NotFound(format!(
            "No PR closing data found for repository: {}",
            params.repo_name
        ))
    })?;

    Ok(Json(PrAvgClosingTimeResponse {
        repository: params.repo_name,
        average_closing_time_seconds: avg_seconds,
        average_closing_time_readable: timefmt::duration_phrase(avg_seconds),
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct PrReviewTimeResponse {
    pub repository: String,
    pub reviewed_pr_count: i64,
    pub average_review_time_seconds: Option<f64>,
    pub average_review_time_readable: Option<String>,
}

/// `GET /stats/prs/review-time`
///
/// Average time until the first review by someone other than the PR
/// author. A repository with no reviewed PRs gets a zero count, not 404.
pub async fn review_time(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<RepoParams>,
) -> Result<Json<PrReviewTimeResponse>, StatsError> {
    let row = Queries::pr_review_stats(warehouse.pool(), &params.repo_name).await?;

    let readable = row.avg_seconds.map(|avg| timefmt::elapsed_phrase(Some(avg)));

    Ok(Json(PrReviewTimeResponse {
        repository: params.repo_name,
        reviewed_pr_count: row.reviewed_pr_count,
        average_review_time_seconds: row.avg_seconds,
        average_review_time_readable: readable,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_basic() {
        assert_eq!(success_rate_percent(7, 10), 70.0);
        assert_eq!(success_rate_percent(10, 10), 100.0);
        assert_eq!(success_rate_percent(0, 10), 0.0);
    }

    #[test]
    fn test_success_rate_rounds_to_two_decimals() {
        assert_eq!(success_rate_percent(1, 3), 33.33);
        assert_eq!(success_rate_percent(2, 3), 66.67);
    }
}
