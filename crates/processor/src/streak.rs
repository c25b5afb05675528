//! Streak statistics over the activity graph

use common::models::{ActivityDay, StreakStats};

/// Compute streaks from days ordered oldest to newest
pub fn streak_stats(days: &[ActivityDay]) -> StreakStats {
    let total_contributions = days.iter().map(|d| d.count).sum();

    let current_streak = days.iter().rev().take_while(|d| d.count > 0).count() as u32;

    let mut longest_streak = 0;
    let mut run = 0;
    for day in days {
        if day.count > 0 {
            run += 1;
            longest_streak = longest_streak.max(run);
        } else {
            run = 0;
        }
    }

    StreakStats {
        current_streak,
        longest_streak,
        total_contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::day_label;
    use chrono::NaiveDate;

    /// Build a window from counts listed newest first
    fn window(newest_first: &[u32]) -> Vec<ActivityDay> {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        newest_first
            .iter()
            .enumerate()
            .rev()
            .map(|(offset, &count)| ActivityDay {
                date: today - chrono::Duration::days(offset as i64),
                label: day_label(offset as u32),
                count,
            })
            .collect()
    }

    #[test]
    fn test_empty_window() {
        assert_eq!(streak_stats(&[]), StreakStats::default());
    }

    #[test]
    fn test_all_zero_window() {
        let stats = streak_stats(&window(&[0; 30]));
        assert_eq!(stats, StreakStats::default());
    }

    #[test]
    fn test_recent_run_and_isolated_day() {
        let mut counts = [0u32; 30];
        counts[..5].copy_from_slice(&[3, 1, 2, 4, 1]);
        counts[10] = 6;

        let stats = streak_stats(&window(&counts));

        assert_eq!(stats.current_streak, 5);
        assert_eq!(stats.longest_streak, 5);
        assert_eq!(stats.total_contributions, 17);
    }

    #[test]
    fn test_no_activity_today_breaks_current_streak() {
        let stats = streak_stats(&window(&[0, 2, 2, 2, 0, 1]));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.total_contributions, 7);
    }

    #[test]
    fn test_longest_run_in_the_past() {
        let stats = streak_stats(&window(&[1, 1, 0, 1, 1, 1, 1, 0, 5]));
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 4);
    }

    #[test]
    fn test_streak_invariants_hold() {
        let samples: [&[u32]; 4] = [
            &[1, 0, 1, 0, 1],
            &[2, 2, 2, 2],
            &[0, 0, 7],
            &[5, 0, 0, 1, 1, 1, 0, 3, 3],
        ];
        for counts in samples {
            let stats = streak_stats(&window(counts));
            assert!(stats.longest_streak >= stats.current_streak);
            assert!(stats.total_contributions >= stats.longest_streak.max(stats.current_streak));
        }
    }
}
