//! Fixed analytical query templates, one per metric.
//!
//! Every statement is a constant string executed with positional binds.
//! Optional behavior (label restriction, opener exclusion, outlier cap) is
//! expressed as bound parameters rather than string-assembled SQL, so each
//! metric has exactly one template regardless of which endpoint variant
//! invokes it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::models::*;

/// Options narrowing the consolidated resolution-time template.
///
/// The plain issue endpoint uses the default; the bug endpoint restricts to
/// `bug`-labeled events and caps durations at one year.
#[derive(Debug, Clone, Default)]
pub struct ResolutionOptions {
    pub label: Option<String>,
    pub max_seconds: Option<f64>,
}

pub struct Queries;

impl Queries {
    /// Open/close event counts in the window plus the latest-action
    /// histogram over issue lifecycles. Always returns one row; counts are
    /// zero for repositories with no matching events.
    pub async fn issue_activity(
        pool: &PgPool,
        repo_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<IssueActivityRow, sqlx::Error> {
        sqlx::query_as::<_, IssueActivityRow>(
            r#"
            WITH lifecycle AS (
                SELECT number, action, created_at
                FROM github_events
                WHERE event_type = 'IssuesEvent'
                  AND repo_name = $1
                  AND action IN ('opened', 'closed', 'reopened')
                  AND created_at >= $2
                  AND created_at < $3
            ),
            latest AS (
                SELECT DISTINCT ON (number) number, action
                FROM lifecycle
                ORDER BY number, created_at DESC
            )
            SELECT
                (SELECT COUNT(*) FROM lifecycle WHERE action = 'opened') AS opened,
                (SELECT COUNT(*) FROM lifecycle WHERE action = 'closed') AS closed,
                (SELECT COUNT(*) FROM latest) AS total_created,
                (SELECT COUNT(*) FROM latest WHERE action IN ('opened', 'reopened')) AS currently_open,
                (SELECT COUNT(*) FROM latest WHERE action = 'closed') AS currently_closed
            "#,
        )
        .bind(repo_name)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
    }

    /// Issue open/close counts grouped by calendar month, `YYYY-MM` keys.
    /// Months without events produce no row; the shaper gap-fills.
    pub async fn monthly_issue_counts(
        pool: &PgPool,
        repo_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthlyIssueCountRow>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyIssueCountRow>(
            r#"
            SELECT
                to_char(date_trunc('month', created_at), 'YYYY-MM') AS month,
                COUNT(*) FILTER (WHERE action = 'opened') AS opened,
                COUNT(*) FILTER (WHERE action = 'closed') AS closed
            FROM github_events
            WHERE event_type = 'IssuesEvent'
              AND action IN ('opened', 'closed')
              AND repo_name = $1
              AND created_at >= $2
              AND created_at < $3
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(repo_name)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Average seconds from issue opening to the first qualifying comment.
    /// Comments must land strictly after the opening; when `exclude_opener`
    /// is bound true, the opener's own comments never qualify.
    pub async fn first_response_avg(
        pool: &PgPool,
        repo_name: &str,
        since: DateTime<Utc>,
        exclude_opener: bool,
    ) -> Result<AvgSecondsRow, sqlx::Error> {
        sqlx::query_as::<_, AvgSecondsRow>(
            r#"
            WITH openings AS (
                SELECT number, created_at AS opened_at, actor_login AS opener_login
                FROM github_events
                WHERE event_type = 'IssuesEvent'
                  AND action = 'opened'
                  AND repo_name = $1
                  AND created_at >= $2
            ),
            first_responses AS (
                SELECT o.number, o.opened_at, MIN(ge.created_at) AS responded_at
                FROM openings o
                JOIN github_events ge
                  ON ge.repo_name = $1 AND ge.number = o.number
                WHERE ge.event_type = 'IssueCommentEvent'
                  AND ge.action = 'created'
                  AND ge.created_at > o.opened_at
                  AND NOT ($3::boolean AND ge.actor_login = o.opener_login)
                GROUP BY o.number, o.opened_at
            )
            SELECT
                AVG(EXTRACT(EPOCH FROM (responded_at - opened_at))::double precision) AS avg_seconds
            FROM first_responses
            "#,
        )
        .bind(repo_name)
        .bind(since)
        .bind(exclude_opener)
        .fetch_one(pool)
        .await
    }

    /// Average resolution time (first open to last close, strictly
    /// positive) and the count of resolved issues. One template serves both
    /// the plain and the bug-labeled variant via bound options.
    pub async fn resolution_stats(
        pool: &PgPool,
        repo_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        options: &ResolutionOptions,
    ) -> Result<ResolutionRow, sqlx::Error> {
        sqlx::query_as::<_, ResolutionRow>(
            r#"
            WITH lifecycle AS (
                SELECT number,
                       MIN(created_at) FILTER (WHERE action = 'opened') AS opened_at,
                       MAX(created_at) FILTER (WHERE action = 'closed') AS closed_at
                FROM github_events
                WHERE event_type = 'IssuesEvent'
                  AND action IN ('opened', 'closed')
                  AND repo_name = $1
                  AND created_at >= $2
                  AND created_at < $3
                  AND ($4::text IS NULL OR $4::text = ANY(labels))
                GROUP BY number
            ),
            durations AS (
                SELECT EXTRACT(EPOCH FROM (closed_at - opened_at))::double precision
                           AS resolution_seconds
                FROM lifecycle
                WHERE opened_at IS NOT NULL
                  AND closed_at IS NOT NULL
                  AND closed_at > opened_at
            )
            SELECT
                AVG(resolution_seconds) AS avg_seconds,
                COUNT(*) AS resolved
            FROM durations
            WHERE $5::double precision IS NULL OR resolution_seconds <= $5::double precision
            "#,
        )
        .bind(repo_name)
        .bind(start)
        .bind(end)
        .bind(options.label.as_deref())
        .bind(options.max_seconds)
        .fetch_one(pool)
        .await
    }

    /// Closed/merged counts over per-PR final states. The final state is
    /// the action and merged flag of the temporally last PullRequestEvent
    /// per number.
    pub async fn pr_success(
        pool: &PgPool,
        repo_name: &str,
    ) -> Result<PrSuccessRow, sqlx::Error> {
        sqlx::query_as::<_, PrSuccessRow>(
            r#"
            WITH final_states AS (
                SELECT DISTINCT ON (number)
                       number, action AS final_action, merged AS final_merged
                FROM github_events
                WHERE event_type = 'PullRequestEvent'
                  AND repo_name = $1
                ORDER BY number, created_at DESC
            )
            SELECT
                COUNT(*) AS total_closed,
                COUNT(*) FILTER (WHERE final_merged) AS merged
            FROM final_states
            WHERE final_action = 'closed'
            "#,
        )
        .bind(repo_name)
        .fetch_one(pool)
        .await
    }

    /// Average seconds from first PR opening to last close, close strictly
    /// after open.
    pub async fn pr_closing_avg(
        pool: &PgPool,
        repo_name: &str,
        since: DateTime<Utc>,
    ) -> Result<AvgSecondsRow, sqlx::Error> {
        sqlx::query_as::<_, AvgSecondsRow>(
            r#"
            WITH openings AS (
                SELECT number, MIN(created_at) AS opened_at
                FROM github_events
                WHERE event_type = 'PullRequestEvent'
                  AND action = 'opened'
                  AND repo_name = $1
                  AND created_at >= $2
                GROUP BY number
            ),
            closings AS (
                SELECT number, MAX(created_at) AS closed_at
                FROM github_events
                WHERE event_type = 'PullRequestEvent'
                  AND action = 'closed'
                  AND repo_name = $1
                  AND created_at >= $2
                GROUP BY number
            )
            SELECT
                AVG(EXTRACT(EPOCH FROM (c.closed_at - o.opened_at))::double precision)
                    AS avg_seconds
            FROM openings o
            JOIN closings c USING (number)
            WHERE c.closed_at > o.opened_at
            "#,
        )
        .bind(repo_name)
        .bind(since)
        .fetch_one(pool)
        .await
    }

    /// Count of PRs with a qualifying first review and the average seconds
    /// to it. A review qualifies when it lands strictly after the opening
    /// and its author is not the PR author; that exclusion is unconditional.
    pub async fn pr_review_stats(
        pool: &PgPool,
        repo_name: &str,
    ) -> Result<PrReviewRow, sqlx::Error> {
        sqlx::query_as::<_, PrReviewRow>(
            r#"
            WITH openings AS (
                SELECT DISTINCT ON (number)
                       number, created_at AS opened_at, actor_login AS author_login
                FROM github_events
                WHERE event_type = 'PullRequestEvent'
                  AND action = 'opened'
                  AND repo_name = $1
                ORDER BY number, created_at
            ),
            first_reviews AS (
                SELECT o.number, o.opened_at, MIN(ge.created_at) AS reviewed_at
                FROM openings o
                JOIN github_events ge
                  ON ge.repo_name = $1 AND ge.number = o.number
                WHERE ge.event_type IN ('PullRequestReviewEvent', 'PullRequestReviewCommentEvent')
                  AND ge.created_at > o.opened_at
                  AND ge.actor_login <> o.author_login
                GROUP BY o.number, o.opened_at
            )
            SELECT
                COUNT(*) AS reviewed_pr_count,
                AVG(EXTRACT(EPOCH FROM (reviewed_at - opened_at))::double precision)
                    AS avg_seconds
            FROM first_reviews
            "#,
        )
        .bind(repo_name)
        .fetch_one(pool)
        .await
    }

    /// Published release counts grouped by calendar month, `YYYY-MM` keys.
    pub async fn monthly_release_counts(
        pool: &PgPool,
        repo_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthlyReleaseCountRow>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyReleaseCountRow>(
            r#"
            SELECT
                to_char(date_trunc('month', created_at), 'YYYY-MM') AS month,
                COUNT(*) AS releases
            FROM github_events
            WHERE event_type = 'ReleaseEvent'
              AND action = 'published'
              AND repo_name = $1
              AND created_at >= $2
              AND created_at < $3
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(repo_name)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Actors whose first event in the repository falls after the cutoff,
    /// ascending by first contribution.
    pub async fn new_contributors(
        pool: &PgPool,
        repo_name: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ContributorRow>, sqlx::Error> {
        sqlx::query_as::<_, ContributorRow>(
            r#"
            SELECT
                actor_login AS username,
                MIN(created_at) AS first_contribution
            FROM github_events
            WHERE repo_name = $1
            GROUP BY actor_login
            HAVING MIN(created_at) >= $2
            ORDER BY first_contribution
            "#,
        )
        .bind(repo_name)
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Timestamp of the most recent event for the repository, if any.
    pub async fn latest_event(
        pool: &PgPool,
        repo_name: &str,
    ) -> Result<LatestEventRow, sqlx::Error> {
        sqlx::query_as::<_, LatestEventRow>(
            r#"
            SELECT MAX(created_at) AS latest_event
            FROM github_events
            WHERE repo_name = $1
            "#,
        )
        .bind(repo_name)
        .fetch_one(pool)
        .await
    }
}
