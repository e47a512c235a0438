//! Contributor growth endpoint.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::database::queries::Queries;
use crate::error::StatsError;
use crate::routes::AppState;

const DEFAULT_LOOKBACK_MONTHS: u32 = 12;
const MAX_LOOKBACK_MONTHS: u32 = 24;

#[derive(Debug, Clone, Deserialize)]
pub struct NewContributorParams {
    pub repo_name: String,
    pub months: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewContributor {
    pub username: String,
    pub first_contribution_date: DateTime<Utc>,
    pub profile_url: String,
}

/// `GET /stats/contributors/new`
///
/// Actors whose first event in the repository falls inside the lookback
/// window. A quiet repository yields an empty list.
pub async fn new_contributors(
    State((_config, warehouse)): State<AppState>,
    Query(params): Query<NewContributorParams>,
) -> Result<Json<Vec<NewContributor>>, StatsError> {
    let months = validate_lookback(params.months)?;

    let cutoff = Utc::now()
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| StatsError::Internal("lookback window underflow".to_string()))?;

    let rows = Queries::new_contributors(warehouse.pool(), &params.repo_name, cutoff).await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| {
                let profile_url = format!("https://github.com/{}", row.username);
                NewContributor {
                    username: row.username,
                    first_contribution_date: row.first_contribution,
                    profile_url,
                }
            })
            .collect(),
    ))
}

/// Reject out-of-range lookbacks before any query runs; never clamp.
fn validate_lookback(months: Option<u32>) -> Result<u32, StatsError> {
    let months = months.unwrap_or(DEFAULT_LOOKBACK_MONTHS);
    if !(1..=MAX_LOOKBACK_MONTHS).contains(&months) {
        return Err(StatsError::InvalidParameter(format!(
            "months must be between 1 and {}, got {}",
            MAX_LOOKBACK_MONTHS, months
        )));
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookback_bounds() {
        assert!(validate_lookback(Some(0)).is_err());
        assert!(validate_lookback(Some(25)).is_err());
        assert_eq!(validate_lookback(Some(1)).unwrap(), 1);
        assert_eq!(validate_lookback(Some(24)).unwrap(), 24);
    }

    #[test]
    fn test_lookback_default() {
        assert_eq!(validate_lookback(None).unwrap(), DEFAULT_LOOKBACK_MONTHS);
    }
}
