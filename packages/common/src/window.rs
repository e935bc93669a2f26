//! Time windows that gate curation.
//!
//! The server wraps these in methods on its entity models; keeping the
//! arithmetic here lets it be tested without a database.

use chrono::{DateTime, Duration, Utc};

use crate::ContestState;

/// A contest is live while it is in the `Live` state and `now` lies within
/// `[start, end]`, both ends inclusive.
pub fn is_contest_live(
    state: ContestState,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    state == ContestState::Live && start <= now && now <= end
}

/// Exclusive end of a film's recommend window, or `None` for a film that
/// was never published.
pub fn recommend_deadline(
    publish_on: Option<DateTime<Utc>>,
    days_per_movie: i32,
) -> Option<DateTime<Utc>> {
    publish_on.map(|published| published + Duration::days(i64::from(days_per_movie)))
}

/// Whether a film published at `publish_on` may still be curated at `now`.
pub fn is_within_recommend_window(
    publish_on: Option<DateTime<Utc>>,
    days_per_movie: i32,
    now: DateTime<Utc>,
) -> bool {
    recommend_deadline(publish_on, days_per_movie).is_some_and(|deadline| now < deadline)
}
