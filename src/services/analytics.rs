//! Admin analytics rollups.
//!
//! Pure read-side computation: every function takes the attempt log (and the
//! key list) as plain data and derives aggregate views from it. Nothing here
//! mutates state, and an empty log produces all-zero metrics rather than
//! errors.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::access_key::AccessKey;
use crate::models::attempt::AttemptLogEntry;

/// Fixed per-call cost estimate used for the dashboard spend figure.
pub const COST_PER_GENERATION_USD: f64 = 0.002;

/// How many keywords the popular list shows.
const POPULAR_LIMIT: usize = 10;

/// Trailing window for the failure feed.
const FAILURE_WINDOW_HOURS: i64 = 48;

/// Trailing window for daily stats, in calendar days including today.
const DAILY_WINDOW_DAYS: i64 = 7;

/// Headline counters shown at the top of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_keys: usize,
    pub total_attempts: usize,
    pub successes: usize,
    pub failures: usize,
    /// Percentage in [0, 100]; 0 when there are no attempts
    pub success_rate: f64,
    pub credits_used: i64,
    pub estimated_cost_usd: f64,
}

/// Attempt counts for one keyword.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordStats {
    pub keyword: String,
    pub attempts: usize,
    pub successes: usize,
    pub failures: usize,
}

/// Attempt counts for one UTC calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub attempts: usize,
    pub successes: usize,
    pub failures: usize,
}

/// Attempt counts for one output format.
#[derive(Debug, Clone, Serialize)]
pub struct FormatStats {
    pub format: String,
    pub attempts: usize,
}

/// Everything the admin dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub popular_keywords: Vec<KeywordStats>,
    pub recent_failures: Vec<AttemptLogEntry>,
    pub daily_stats: Vec<DailyStats>,
    pub format_stats: Vec<FormatStats>,
}

/// Build the full dashboard from the key list and attempt log.
///
/// `now` is passed in rather than read from the clock so the trailing
/// windows are testable.
pub fn dashboard(
    keys: &[AccessKey],
    attempts: &[AttemptLogEntry],
    now: DateTime<Utc>,
) -> Dashboard {
    Dashboard {
        summary: summary(keys, attempts),
        popular_keywords: popular_keywords(attempts),
        recent_failures: recent_failures(attempts, now),
        daily_stats: daily_stats(attempts, now),
        format_stats: format_stats(attempts),
    }
}

pub fn summary(keys: &[AccessKey], attempts: &[AttemptLogEntry]) -> Summary {
    let successes = attempts.iter().filter(|a| a.success).count();
    let failures = attempts.len() - successes;
    let success_rate = if attempts.is_empty() {
        0.0
    } else {
        successes as f64 / attempts.len() as f64 * 100.0
    };

    Summary {
        total_keys: keys.len(),
        total_attempts: attempts.len(),
        successes,
        failures,
        success_rate,
        credits_used: keys.iter().map(|k| k.credits_used as i64).sum(),
        estimated_cost_usd: attempts.len() as f64 * COST_PER_GENERATION_USD,
    }
}

/// Top keywords by attempt count, ties broken alphabetically for a stable
/// display order.
pub fn popular_keywords(attempts: &[AttemptLogEntry]) -> Vec<KeywordStats> {
    let mut by_keyword: HashMap<&str, KeywordStats> = HashMap::new();

    for attempt in attempts {
        let stats = by_keyword
            .entry(attempt.keyword.as_str())
            .or_insert_with(|| KeywordStats {
                keyword: attempt.keyword.clone(),
                attempts: 0,
                successes: 0,
                failures: 0,
            });
        stats.attempts += 1;
        if attempt.success {
            stats.successes += 1;
        } else {
            stats.failures += 1;
        }
    }

    let mut ranked: Vec<KeywordStats> = by_keyword.into_values().collect();
    ranked.sort_by(|a, b| b.attempts.cmp(&a.attempts).then(a.keyword.cmp(&b.keyword)));
    ranked.truncate(POPULAR_LIMIT);
    ranked
}

/// Failures within the trailing 48-hour window, newest first.
pub fn recent_failures(attempts: &[AttemptLogEntry], now: DateTime<Utc>) -> Vec<AttemptLogEntry> {
    let cutoff = now - Duration::hours(FAILURE_WINDOW_HOURS);
    let mut failures: Vec<AttemptLogEntry> = attempts
        .iter()
        .filter(|a| !a.success && a.created_at >= cutoff)
        .cloned()
        .collect();
    failures.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    failures
}

/// Attempts grouped by UTC calendar day over the trailing week,
/// chronological, with zero rows for quiet days.
pub fn daily_stats(attempts: &[AttemptLogEntry], now: DateTime<Utc>) -> Vec<DailyStats> {
    let today = now.date_naive();

    (0..DAILY_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let day_attempts: Vec<&AttemptLogEntry> = attempts
                .iter()
                .filter(|a| a.created_at.date_naive() == date)
                .collect();
            let successes = day_attempts.iter().filter(|a| a.success).count();

            DailyStats {
                date,
                attempts: day_attempts.len(),
                successes,
                failures: day_attempts.len() - successes,
            }
        })
        .collect()
}

/// Attempt counts grouped by requested output format, busiest first.
pub fn format_stats(attempts: &[AttemptLogEntry]) -> Vec<FormatStats> {
    let mut by_format: HashMap<&str, usize> = HashMap::new();
    for attempt in attempts {
        *by_format.entry(attempt.output_format.as_str()).or_default() += 1;
    }

    let mut stats: Vec<FormatStats> = by_format
        .into_iter()
        .map(|(format, attempts)| FormatStats {
            format: format.to_string(),
            attempts,
        })
        .collect();
    stats.sort_by(|a, b| b.attempts.cmp(&a.attempts).then(a.format.cmp(&b.format)));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::access_key::AccessKey;

    fn attempt(keyword: &str, success: bool, hours_ago: i64, format: &str) -> AttemptLogEntry {
        let mut entry = if success {
            AttemptLogEntry::success("KWA-AAA-BBB-CCC", keyword, "standard", format)
        } else {
            AttemptLogEntry::failure(
                "KWA-AAA-BBB-CCC",
                keyword,
                "standard",
                format,
                "provider error".into(),
            )
        };
        entry.created_at = Utc::now() - Duration::hours(hours_ago);
        entry
    }

    #[test]
    fn empty_log_yields_zeroes() {
        let dashboard = dashboard(&[], &[], Utc::now());
        assert_eq!(dashboard.summary.total_attempts, 0);
        assert_eq!(dashboard.summary.success_rate, 0.0);
        assert_eq!(dashboard.summary.estimated_cost_usd, 0.0);
        assert!(dashboard.popular_keywords.is_empty());
        assert!(dashboard.recent_failures.is_empty());
        assert_eq!(dashboard.daily_stats.len(), 7);
        assert!(dashboard.daily_stats.iter().all(|d| d.attempts == 0));
        assert!(dashboard.format_stats.is_empty());
    }

    #[test]
    fn summary_counts_and_rate() {
        let mut key = AccessKey::new("KWA-AAA-BBB-CCC".into(), "basic".into(), 10, None);
        key.credits_used = 3;

        let attempts = vec![
            attempt("a", true, 1, "wordpress"),
            attempt("a", true, 1, "wordpress"),
            attempt("b", false, 1, "ghost"),
            attempt("c", true, 1, "ghost"),
        ];

        let summary = summary(&[key], &attempts);
        assert_eq!(summary.total_keys, 1);
        assert_eq!(summary.total_attempts, 4);
        assert_eq!(summary.successes, 3);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.success_rate, 75.0);
        assert_eq!(summary.credits_used, 3);
        assert!((summary.estimated_cost_usd - 4.0 * COST_PER_GENERATION_USD).abs() < 1e-9);
    }

    #[test]
    fn popular_keywords_ranked_with_per_keyword_outcomes() {
        let attempts = vec![
            attempt("rust", true, 1, "wordpress"),
            attempt("rust", false, 1, "wordpress"),
            attempt("rust", true, 2, "wordpress"),
            attempt("axum", true, 1, "wordpress"),
        ];

        let popular = popular_keywords(&attempts);
        assert_eq!(popular[0].keyword, "rust");
        assert_eq!(popular[0].attempts, 3);
        assert_eq!(popular[0].successes, 2);
        assert_eq!(popular[0].failures, 1);
        assert_eq!(popular[1].keyword, "axum");
    }

    #[test]
    fn failure_window_is_48_hours_newest_first() {
        let attempts = vec![
            attempt("old", false, 49, "wordpress"),
            attempt("recent", false, 2, "wordpress"),
            attempt("newest", false, 1, "wordpress"),
            attempt("fine", true, 1, "wordpress"),
        ];

        let failures = recent_failures(&attempts, Utc::now());
        let keywords: Vec<&str> = failures.iter().map(|f| f.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["newest", "recent"]);
    }

    #[test]
    fn daily_stats_cover_a_week_in_order() {
        let attempts = vec![
            attempt("a", true, 0, "wordpress"),
            attempt("b", false, 24, "wordpress"),
            // Outside the window
            attempt("c", true, 24 * 8, "wordpress"),
        ];

        let daily = daily_stats(&attempts, Utc::now());
        assert_eq!(daily.len(), 7);
        assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(daily[6].attempts, 1);
        assert_eq!(daily[6].successes, 1);
        assert_eq!(daily[5].failures, 1);
        assert_eq!(daily.iter().map(|d| d.attempts).sum::<usize>(), 2);
    }

    #[test]
    fn format_stats_grouped_and_sorted() {
        let attempts = vec![
            attempt("a", true, 1, "ghost"),
            attempt("b", true, 1, "wordpress"),
            attempt("c", false, 1, "ghost"),
        ];

        let stats = format_stats(&attempts);
        assert_eq!(stats[0].format, "ghost");
        assert_eq!(stats[0].attempts, 2);
        assert_eq!(stats[1].format, "wordpress");
    }
}
