//! Release cadence endpoint.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::MonthlyReleaseCountRow;
use crate::database::queries::Queries;
use crate::error::StatsError;
use crate::routes::{start_of_day, AppState};
use crate::series::{self, MonthKey};

const DEFAULT_WINDOW_MONTHS: u32 = 12;

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseFrequencyParams {
    pub repo_name: String,
    pub start_month: Option<String>,
    pub end_month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReleaseStat {
    pub month: String,
    pub releases: i64,
}

/// `GET /stats/releases/frequency`
///
/// Published releases per calendar month, gap-filled across the requested
/// window (default: trailing 12 months).
pub async fn frequency(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<ReleaseFrequencyParams>,
) -> Result<Json<Vec<MonthlyReleaseStat>>, StatsError> {
    let (start, end) = resolve_window(
        params.start_month.as_deref(),
        params.end_month.as_deref(),
        Utc::now(),
    )?;

    let rows = Queries::monthly_release_counts(
        warehouse.pool(),
        &params.repo_name,
        start_of_day(start.first_day()),
        start_of_day(end.next().first_day()),
    )
    .await?;

    Ok(Json(fill_release_buckets(
        series::month_range(start, end),
        &rows,
    )))
}

/// Parse and validate the month window before anything touches the
/// warehouse.
pub fn resolve_window(
    start_month: Option<&str>,
    end_month: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(MonthKey, MonthKey), StatsError> {
    let (default_start, default_end) = series::trailing_window(now, DEFAULT_WINDOW_MONTHS);

    let start = match start_month {
        Some(raw) => raw.parse()?,
        None => default_start,
    };
    let end = match end_month {
        Some(raw) => raw.parse()?,
        None => default_end,
    };

    if start > end {
        return Err(StatsError::InvalidParameter(format!(
            "start_month {} is after end_month {}",
            start, end
        )));
    }

    Ok((start, end))
}

pub fn fill_release_buckets(
    months: Vec<MonthKey>,
    rows: &[MonthlyReleaseCountRow],
) -> Vec<MonthlyReleaseStat> {
    let by_month: HashMap<&str, i64> = rows
        .iter()
        .map(|row| (row.month.as_str(), row.releases))
        .collect();

    months
        .into_iter()
        .map(|month| {
            let key = month.to_string();
            let releases = by_month.get(key.as_str()).copied().unwrap_or(0);
            MonthlyReleaseStat {
                month: key,
                releases,
            }
        })
        .collect()
}
