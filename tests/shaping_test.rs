//! Shaping-layer contract tests: gap-filled series and the two duration
//! formatting policies.

use repostats::database::models::MonthlyIssueCountRow;
use repostats::routes::issues::fill_monthly_issue_buckets;
use repostats::series::{month_range, MonthKey};
use repostats::timefmt::{duration_phrase, elapsed_phrase};

#[test]
fn test_bucket_list_covers_window_exactly_once() {
    let windows = [
        ("2023-01", "2023-12", 12),
        ("2023-11", "2024-02", 4),
        ("2024-06", "2024-06", 1),
        ("2019-12", "2020-03", 4),
    ];

    for (start, end, expected_len) in windows {
        let months = month_range(start.parse().unwrap(), end.parse().unwrap());
        assert_eq!(months.len(), expected_len, "window {}..={}", start, end);

        let rendered: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        let mut sorted = rendered.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(rendered, sorted, "strictly ascending, no repeats");
    }
}

#[test]
fn test_gap_filled_buckets_zero_out_missing_months() {
    let months = month_range("2024-01".parse().unwrap(), "2024-06".parse().unwrap());
    let rows = vec![MonthlyIssueCountRow {
        month: "2024-03".to_string(),
        opened: 9,
        closed: 2,
    }];

    let buckets = fill_monthly_issue_buckets(months, &rows);

    assert_eq!(buckets.len(), 6);
    assert_eq!(buckets[2].month, "2024-03");
    assert_eq!(buckets[2].opened, 9);
    assert_eq!(buckets[2].closed, 2);
    assert!(buckets
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2)
        .all(|(_, b)| b.opened == 0 && b.closed == 0));
}

#[test]
fn test_month_key_ordering_across_years() {
    let earlier: MonthKey = "2023-12".parse().unwrap();
    let later: MonthKey = "2024-01".parse().unwrap();
    assert!(earlier < later);
}

#[test]
fn test_elapsed_phrase_contract() {
    assert_eq!(elapsed_phrase(None), "Unknown");
    assert_eq!(elapsed_phrase(Some(0.0)), "Just now");
    assert_eq!(elapsed_phrase(Some(90_000.0)), "1 day, 1 hour");
    assert_eq!(elapsed_phrase(Some(45.0)), "45 seconds");
}

#[test]
fn test_duration_phrase_contract() {
    assert_eq!(duration_phrase(90_061.0), "1 day 1 hour");
    assert_eq!(duration_phrase(45.0), "45 seconds");
    assert_eq!(duration_phrase(0.0), "0 seconds");
}

#[test]
fn test_formatting_policies_differ_on_the_same_input() {
    // One policy is comma-joined and exhaustive, the other space-joined
    // and truncated; endpoints rely on the distinction.
    let seconds = (2 * 86_400 + 5 * 3_600 + 30 * 60) as f64;
    assert_eq!(elapsed_phrase(Some(seconds)), "2 days, 5 hours, 30 minutes");
    assert_eq!(duration_phrase(seconds), "2 days 5 hours");
}
