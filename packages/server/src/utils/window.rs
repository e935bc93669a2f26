use chrono::{DateTime, Utc};
use common::window;

use crate::entity::{contest, movie};

impl contest::Model {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        window::is_contest_live(self.state, self.start_time, self.end_time, now)
    }
}

impl movie::Model {
    /// Published, entered in `contest`, and `contest` is live.
    pub fn is_contest_live(&self, contest: &contest::Model, now: DateTime<Utc>) -> bool {
        self.state.is_published() && self.contest_id == Some(contest.id) && contest.is_live(now)
    }

    pub fn recommend_deadline(&self, contest: &contest::Model) -> Option<DateTime<Utc>> {
        window::recommend_deadline(self.publish_on, contest.days_per_movie)
    }

    pub fn is_recommend_eligible(&self, contest: &contest::Model, now: DateTime<Utc>) -> bool {
        window::is_within_recommend_window(self.publish_on, contest.days_per_movie, now)
    }
}
