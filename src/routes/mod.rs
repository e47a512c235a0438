//! API route definitions.

pub mod contributors;
pub mod issues;
pub mod prs;
pub mod quality;
pub mod releases;

use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::Warehouse;

/// State injected into every handler.
pub type AppState = (AppConfig, Warehouse);

/// Build the complete API router.
///
/// - `GET /health` - Liveness check
/// - `GET /stats/issues/open-closed` - Open/close counts and current state
/// - `GET /stats/issues/open-closed/monthly` - Trailing 6-month series
/// - `GET /stats/issues/first-response-time` - Average time to first comment
/// - `GET /stats/issues/avg-resolution-time` - Average open-to-close time
/// - `GET /stats/bugs/avg-resolution-time` - Same, bug-labeled issues only
/// - `GET /stats/prs/success-rate` - Share of closed PRs that merged
/// - `GET /stats/prs/avg-closing-time` - Average open-to-close time
/// - `GET /stats/prs/review-time` - Average time to first outside review
/// - `GET /stats/releases/frequency` - Releases per month
/// - `GET /stats/contributors/new` - First-time contributors in a lookback
/// - `GET /stats/data-quality` - Event recency and freshness status
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats/issues/open-closed", get(issues::open_closed))
        .route(
            "/stats/issues/open-closed/monthly",
            get(issues::open_closed_monthly),
        )
        .route(
            "/stats/issues/first-response-time",
            get(issues::first_response_time),
        )
        .route(
            "/stats/issues/avg-resolution-time",
            get(issues::avg_resolution_time),
        )
        .route(
            "/stats/bugs/avg-resolution-time",
            get(issues::bug_avg_resolution_time),
        )
        .route("/stats/prs/success-rate", get(prs::success_rate))
        .route("/stats/prs/avg-closing-time", get(prs::avg_closing_time))
        .route("/stats/prs/review-time", get(prs::review_time))
        .route("/stats/releases/frequency", get(releases::frequency))
        .route("/stats/contributors/new", get(contributors::new_contributors))
        .route("/stats/data-quality", get(quality::data_quality))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "repostats",
        "timestamp": Utc::now()
    }))
}

/// Parameters for endpoints that only scope by repository.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoParams {
    pub repo_name: String,
}

/// Query window echoed back in period-scoped responses.
#[derive(Debug, Clone, Serialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

/// A resolved day-granularity window: half-open bind range plus the
/// inclusive dates echoed to the caller.
pub(crate) struct DayWindow {
    pub start: DateTime<Utc>,
    pub end_exclusive: DateTime<Utc>,
    pub period: Period,
}

/// Effectively "beginning of time" for this event domain.
pub(crate) fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).expect("valid date")
}

pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Resolve optional date parameters into a bindable window. The end date
/// is inclusive of its whole day.
pub(crate) fn day_window(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> DayWindow {
    let start = start_date.unwrap_or_else(default_start_date);
    let end = end_date.unwrap_or_else(|| Utc::now().date_naive());
    DayWindow {
        start: start_of_day(start),
        end_exclusive: start_of_day(end.succ_opt().unwrap_or(end)),
        period: Period {
            start: start.to_string(),
            end: end.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_window_defaults() {
        let window = day_window(None, None);
        assert_eq!(window.period.start, "2010-01-01");
        assert_eq!(window.period.end, Utc::now().date_naive().to_string());
        assert!(window.start < window.end_exclusive);
    }

    #[test]
    fn test_day_window_includes_whole_end_day() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let window = day_window(Some(start), Some(end));
        assert_eq!(window.end_exclusive, start_of_day(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
        assert_eq!(window.period.end, "2024-03-31");
    }
}
