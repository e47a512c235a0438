//! Issue throughput, responsiveness, and resolution endpoints.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::MonthlyIssueCountRow;
use crate::database::queries::{Queries, ResolutionOptions};
use crate::error::StatsError;
use crate::routes::{day_window, default_start_date, start_of_day, AppState, Period, RepoParams};
use crate::series::{self, MonthKey};
use crate::timefmt;

/// Bug resolutions beyond a year are treated as bad data, not signal.
const BUG_RESOLUTION_CAP_SECONDS: f64 = 365.0 * 86_400.0;

/// The monthly series always covers the trailing half year.
const MONTHLY_WINDOW_MONTHS: u32 = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct IssueWindowParams {
    pub repo_name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueCounts {
    pub opened: i64,
    pub closed: i64,
    pub total_created: i64,
    pub currently_open: i64,
    pub currently_closed: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuesOpenClosedResponse {
    pub repository: String,
    pub period: Period,
    pub issues: IssueCounts,
}

/// `GET /stats/issues/open-closed`
///
/// Open/close event counts in the window plus derived current state.
/// Repositories with no activity return zeroes, never 404.
pub async fn open_closed(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<IssueWindowParams>,
) -> Result<Json<IssuesOpenClosedResponse>, StatsError> {
    let window = day_window(params.start_date, params.end_date);

    let row = Queries::issue_activity(
        warehouse.pool(),
        &params.repo_name,
        window.start,
        window.end_exclusive,
    )
    .await?;

    Ok(Json(IssuesOpenClosedResponse {
        repository: params.repo_name,
        period: window.period,
        issues: IssueCounts {
            opened: row.opened,
            closed: row.closed,
            total_created: row.total_created,
            currently_open: row.currently_open,
            currently_closed: row.currently_closed,
        },
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyIssueStat {
    pub month: String,
    pub opened: i64,
    pub closed: i64,
}

/// `GET /stats/issues/open-closed/monthly`
///
/// Opened/closed counts for each of the trailing six calendar months,
/// gap-filled so every month appears exactly once.
pub async fn open_closed_monthly(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<RepoParams>,
) -> Result<Json<Vec<MonthlyIssueStat>>, StatsError> {
    let (start, end) = series::trailing_window(Utc::now(), MONTHLY_WINDOW_MONTHS);

    let rows = Queries::monthly_issue_counts(
        warehouse.pool(),
        &params.repo_name,
        start_of_day(start.first_day()),
        start_of_day(end.next().first_day()),
    )
    .await?;

    Ok(Json(fill_monthly_issue_buckets(
        series::month_range(start, end),
        &rows,
    )))
}

/// Left-join query rows onto the enumerated month range; absent months get
/// zero counts.
pub fn fill_monthly_issue_buckets(
    months: Vec<MonthKey>,
    rows: &[MonthlyIssueCountRow],
) -> Vec<MonthlyIssueStat> {
    let by_month: HashMap<&str, &MonthlyIssueCountRow> =
        rows.iter().map(|row| (row.month.as_str(), row)).collect();

    months
        .into_iter()
        .map(|month| {
            let key = month.to_string();
            let (opened, closed) = match by_month.get(key.as_str()) {
                Some(row) => (row.opened, row.closed),
                None => (0, 0),
            };
            MonthlyIssueStat {
                month: key,
                opened,
                closed,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirstResponseParams {
    pub repo_name: String,
    pub start_date: Option<NaiveDate>,
    pub exclude_opener_comments: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FirstResponseTimeResponse {
    pub repository: String,
    pub average_response_time_seconds: f64,
    pub average_response_time_readable: String,
}

/// `GET /stats/issues/first-response-time`
///
/// Average time from issue opening to the first qualifying comment.
/// Comments by the opener are excluded unless the caller opts out.
pub async fn first_response_time(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<FirstResponseParams>,
) -> Result<Json<FirstResponseTimeResponse>, StatsError> {
    let since = start_of_day(params.start_date.unwrap_or_else(default_start_date));
    let exclude_opener = params.exclude_opener_comments.unwrap_or(true);

    let row = Queries::first_response_avg(
        warehouse.pool(),
        &params.repo_name,
        since,
        exclude_opener,
    )
    .await?;

    let avg_seconds = row.avg_seconds.ok_or_else(|| {
        StatsError::NotFound(format!(
            "No response data found for issues in repository: {}",
            params.repo_name
        ))
    })?;

    Ok(Json(FirstResponseTimeResponse {
        repository: params.repo_name,
        average_response_time_seconds: avg_seconds,
        average_response_time_readable: timefmt::duration_phrase(avg_seconds),
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolutionTimeResponse {
    pub repository: String,
    pub period: Period,
    pub average_resolution_time_seconds: f64,
    pub average_resolution_time_readable: String,
    pub total_issues_resolved: i64,
}

/// `GET /stats/issues/avg-resolution-time`
///
/// Average time from first opening to last close across resolved issues.
pub async fn avg_resolution_time(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<IssueWindowParams>,
) -> Result<Json<ResolutionTimeResponse>, StatsError> {
    resolution_time(
        &warehouse,
        params,
        ResolutionOptions::default(),
        "No issue resolution data found for repository",
    )
    .await
}

/// `GET /stats/bugs/avg-resolution-time`
///
/// Same metric restricted to bug-labeled issues, with the one-year
/// outlier cap applied.
pub async fn bug_avg_resolution_time(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<IssueWindowParams>,
) -> Result<Json<ResolutionTimeResponse>, StatsError> {
    resolution_time(
        &warehouse,
        params,
        ResolutionOptions {
            label: Some("bug".to_string()),
            max_seconds: Some(BUG_RESOLUTION_CAP_SECONDS),
        },
        "No bug resolution data found for repository",
    )
    .await
}

async fn resolution_time(
    warehouse: &crate::database::Warehouse,
    params: IssueWindowParams,
    options: ResolutionOptions,
    missing: &str,
) -> Result<Json<ResolutionTimeResponse>, StatsError> {
    let window = day_window(params.start_date, params.end_date);

    let row = Queries::resolution_stats(
        warehouse.pool(),
        &params.repo_name,
        window.start,
        window.end_exclusive,
        &options,
    )
    .await?;

    let avg_seconds = row
        .avg_seconds
        .ok_or_else(|| StatsError::NotFound(format!("{}: {}", missing, params.repo_name)))?;

    Ok(Json(ResolutionTimeResponse {
        repository: params.repo_name,
        period: window.period,
        average_resolution_time_seconds: avg_seconds,
        average_resolution_time_readable: timefmt::duration_phrase(avg_seconds),
        total_issues_resolved: row.resolved,
    }))
}
