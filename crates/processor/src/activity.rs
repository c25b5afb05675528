//! Daily activity time series
//!
//! Commits, PR creations and issue creations are bucketed by UTC calendar date
//! over a trailing window ending on the day of `now`.

use chrono::{DateTime, Duration, Utc};
use common::models::{ActivityDay, RawSignals};

/// Default window for the activity graph
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Label for a day `offset` days before today
pub fn day_label(offset: u32) -> String {
    match offset {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        n => format!("{}d ago", n),
    }
}

/// Build `window_days` daily buckets, oldest first, the last one being today.
///
/// Events without a timestamp, or falling outside the window, are not counted.
pub fn activity_days(
    signals: &RawSignals,
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<ActivityDay> {
    let today = now.date_naive();
    let window = window_days as i64;

    let mut days: Vec<ActivityDay> = (0..window_days)
        .rev()
        .map(|offset| ActivityDay {
            date: today - Duration::days(offset as i64),
            label: day_label(offset),
            count: 0,
        })
        .collect();

    let timestamps = signals
        .commits
        .iter()
        .map(|c| c.committed_at)
        .chain(signals.pull_requests.iter().map(|pr| pr.created_at))
        .chain(signals.issues.iter().map(|i| i.created_at))
        .flatten();

    for ts in timestamps {
        let offset = (today - ts.date_naive()).num_days();
        if (0..window).contains(&offset) {
            let idx = (window - 1 - offset) as usize;
            days[idx].count += 1;
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::models::{CommitSignal, IssueSignal, IssueState, PrState, PullRequestSignal};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn commit(at: Option<DateTime<Utc>>) -> CommitSignal {
        CommitSignal {
            message: "Add activity graph".to_string(),
            committed_at: at,
            author_login: None,
        }
    }

    fn pr(at: Option<DateTime<Utc>>) -> PullRequestSignal {
        PullRequestSignal {
            state: PrState::Open,
            created_at: at,
            merged_at: None,
            comment_count: 0,
        }
    }

    fn issue(at: Option<DateTime<Utc>>) -> IssueSignal {
        IssueSignal {
            state: IssueState::Open,
            created_at: at,
            comment_count: 0,
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(day_label(0), "Today");
        assert_eq!(day_label(1), "Yesterday");
        assert_eq!(day_label(2), "2d ago");
        assert_eq!(day_label(29), "29d ago");
    }

    #[test]
    fn test_empty_signals_give_zeroed_window() {
        let days = activity_days(&RawSignals::default(), 30, now());

        assert_eq!(days.len(), 30);
        assert!(days.iter().all(|d| d.count == 0));
        assert_eq!(days[0].label, "29d ago");
        assert_eq!(days[28].label, "Yesterday");
        assert_eq!(days[29].label, "Today");
        assert_eq!(days[29].date, now().date_naive());
    }

    #[test]
    fn test_counts_all_event_kinds_by_calendar_day() {
        let signals = RawSignals {
            commits: vec![
                // Early morning and late evening of the same day share a bucket
                commit(Some(Utc.with_ymd_and_hms(2026, 3, 15, 0, 5, 0).unwrap())),
                commit(Some(Utc.with_ymd_and_hms(2026, 3, 15, 23, 55, 0).unwrap())),
                commit(Some(Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap())),
            ],
            pull_requests: vec![pr(Some(Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap()))],
            issues: vec![issue(Some(Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap()))],
            ..Default::default()
        };

        let days = activity_days(&signals, 30, now());

        assert_eq!(days[29].count, 2); // today
        assert_eq!(days[28].count, 2); // yesterday
        assert_eq!(days[24].count, 1); // 5d ago
        assert_eq!(days[24].label, "5d ago");
        assert_eq!(days.iter().map(|d| d.count).sum::<u32>(), 5);
    }

    #[test]
    fn test_excludes_missing_and_out_of_window_timestamps() {
        let signals = RawSignals {
            commits: vec![
                commit(None),
                // 30 days ago falls just outside a 30-day window
                commit(Some(Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap())),
                // Future events are not counted either
                commit(Some(Utc.with_ymd_and_hms(2026, 3, 16, 1, 0, 0).unwrap())),
                // 29 days ago is the oldest bucket
                commit(Some(Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap())),
            ],
            pull_requests: vec![pr(None)],
            issues: vec![issue(None)],
            ..Default::default()
        };

        let days = activity_days(&signals, 30, now());

        assert_eq!(days[0].count, 1);
        assert_eq!(days.iter().map(|d| d.count).sum::<u32>(), 1);
    }

    #[test]
    fn test_custom_window() {
        let signals = RawSignals {
            commits: vec![commit(Some(Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap()))],
            ..Default::default()
        };

        let days = activity_days(&signals, 7, now());
        assert_eq!(days.len(), 7);
        assert!(days.iter().all(|d| d.count == 0));

        let days = activity_days(&signals, 8, now());
        assert_eq!(days[0].count, 1);
        assert_eq!(days[0].label, "7d ago");
    }

    #[test]
    fn test_zero_window_is_empty() {
        assert!(activity_days(&RawSignals::default(), 0, now()).is_empty());
    }
}
