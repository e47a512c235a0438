//! Human-readable rendering of second counts.
//!
//! Two deliberately distinct policies are exposed. `elapsed_phrase` renders
//! every non-zero unit (comma-joined) and is used for "time since" values;
//! `duration_phrase` renders at most the two largest units (space-joined)
//! and is used for averaged durations. Endpoints depend on the exact
//! wording of each, so the two must not be merged.

const DAY: i64 = 86_400;
const HOUR: i64 = 3_600;
const MINUTE: i64 = 60;

fn unit(value: i64, name: &str) -> String {
    if value == 1 {
        format!("{} {}", value, name)
    } else {
        format!("{} {}s", value, name)
    }
}

fn decompose(total: i64) -> (i64, i64, i64, i64) {
    let days = total / DAY;
    let rem = total % DAY;
    let hours = rem / HOUR;
    let rem = rem % HOUR;
    let minutes = rem / MINUTE;
    let seconds = rem % MINUTE;
    (days, hours, minutes, seconds)
}

/// General-purpose phrase for an elapsed amount of time.
///
/// `None` renders as `"Unknown"`. Seconds are shown only for sub-minute
/// totals; a value that decomposes to nothing renders as `"Just now"`.
pub fn elapsed_phrase(seconds: Option<f64>) -> String {
    let total = match seconds {
        None => return "Unknown".to_string(),
        Some(s) => s.max(0.0) as i64,
    };

    let (days, hours, minutes, secs) = decompose(total);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(unit(days, "day"));
    }
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    if secs > 0 && parts.is_empty() {
        parts.push(unit(secs, "second"));
    }

    if parts.is_empty() {
        return "Just now".to_string();
    }

    parts.join(", ")
}

/// Compact phrase for an averaged duration: the two largest non-zero
/// units, space-joined. An empty decomposition renders as `"0 seconds"`.
pub fn duration_phrase(seconds: f64) -> String {
    let total = seconds.max(0.0) as i64;
    let (days, hours, minutes, secs) = decompose(total);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(unit(days, "day"));
    }
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    if secs > 0 {
        parts.push(unit(secs, "second"));
    }

    if parts.is_empty() {
        return "0 seconds".to_string();
    }

    parts.truncate(2);
    parts.join(" ")
}
