pub mod contest_state;
pub mod movie_state;
pub mod scoring;
pub mod window;

pub use contest_state::ContestState;
pub use movie_state::{CrewRequestState, MovieState};
pub use scoring::TieBreak;

/// Name of the global, out-of-contest recommendation list every user owns.
pub const RECOMMENDATION_LIST_NAME: &str = "Recommendation";

/// Crew role whose members are ranked on the Top Creators leaderboard.
pub const DIRECTOR_ROLE: &str = "Director";

/// Error when parsing an invalid state string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid state '{invalid}'. Valid values: {valid}")]
pub struct ParseStateError {
    invalid: String,
    valid: String,
}

impl ParseStateError {
    pub(crate) fn new<'a>(invalid: &str, valid: impl Iterator<Item = &'a str>) -> Self {
        Self {
            invalid: invalid.to_owned(),
            valid: valid.collect::<Vec<_>>().join(", "),
        }
    }
}
