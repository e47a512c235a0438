use chrono::{DateTime, Utc};

/// Issue open/close counts plus the latest-action histogram for a window.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IssueActivityRow {
    pub opened: i64,
    pub closed: i64,
    pub total_created: i64,
    pub currently_open: i64,
    pub currently_closed: i64,
}

/// One calendar month of issue open/close counts. `month` is `YYYY-MM`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlyIssueCountRow {
    pub month: String,
    pub opened: i64,
    pub closed: i64,
}

/// A single averaged duration, null when no row qualified.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AvgSecondsRow {
    pub avg_seconds: Option<f64>,
}

/// Resolution average plus how many issues qualified.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResolutionRow {
    pub avg_seconds: Option<f64>,
    pub resolved: i64,
}

/// Final-state counts for pull requests.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PrSuccessRow {
    pub total_closed: i64,
    pub merged: i64,
}

/// First-review average plus how many PRs received a qualifying review.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PrReviewRow {
    pub reviewed_pr_count: i64,
    pub avg_seconds: Option<f64>,
}

/// One calendar month of release counts. `month` is `YYYY-MM`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlyReleaseCountRow {
    pub month: String,
    pub releases: i64,
}

/// An actor and the timestamp of their first event in the repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContributorRow {
    pub username: String,
    pub first_contribution: DateTime<Utc>,
}

/// Most recent event timestamp for a repository, null when none exist.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LatestEventRow {
    pub latest_event: Option<DateTime<Utc>>,
}
