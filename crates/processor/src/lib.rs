//! Signal aggregation and ranking engine
//!
//! Pure calculators over [`common::models::RawSignals`]. Nothing here performs I/O
//! or reads the clock; callers pass `now` explicitly.

pub mod activity;
pub mod analytics;
pub mod languages;
pub mod rank;
pub mod report;
pub mod streak;


pub use activity::activity_days;
pub use analytics::calculate_analytics;
pub use rank::{calculate_rank, Popularity, RankBreakdown, RankPolicy};
pub use report::{build_report, RepoReport};
pub use streak::streak_stats;
