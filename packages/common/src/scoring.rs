//! Leaderboard arithmetic shared by the batch scorers.
//!
//! Everything here is pure: the server gathers per-contest inputs from the
//! database, hands them to these functions and persists what comes back.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Weight of the average jury and audience ratings in a director's composite.
pub const RATING_WEIGHT: f64 = 0.3;
/// Weight of each average non-celebrity recommendation.
pub const AUDIENCE_RECOMMEND_WEIGHT: f64 = 0.025;
/// Weight of each average celebrity recommendation.
pub const CELEB_RECOMMEND_WEIGHT: f64 = 0.5;
/// Upper bound of each recommendation bonus term.
pub const RECOMMEND_BONUS_CAP: f64 = 5.0;
/// Composite scores are published on a x10 scale.
pub const SCORE_SCALE: f64 = 10.0;

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How directors with equal scores are ordered.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lexicographically later names rank first.
    #[default]
    NameDesc,
    /// Lexicographically earlier names rank first.
    NameAsc,
}

impl TieBreak {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Self::NameDesc => b.cmp(a),
            Self::NameAsc => a.cmp(b),
        }
    }
}

/// A leaderboard entry with its 1-based position.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranked<T> {
    pub pos: i32,
    pub entry: T,
}

fn assign_positions<T>(entries: Vec<T>) -> Vec<Ranked<T>> {
    entries
        .into_iter()
        .zip(1..)
        .map(|(entry, pos)| Ranked { pos, entry })
        .collect()
}

/// Inputs contributed by one published film to its director's score.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilmStats {
    pub jury_rating: Option<f64>,
    pub audience_rating: Option<f64>,
    /// Curation lists in the contest holding this film, owned by non-celebrities.
    pub audience_recommends: u32,
    /// Curation lists in the contest holding this film, owned by celebrities.
    pub celeb_recommends: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreatorScore {
    pub profile_id: i32,
    pub name: String,
    pub avg_jury: f64,
    pub avg_audience: f64,
    pub avg_audience_recommends: f64,
    pub avg_celeb_recommends: f64,
    pub composite: f64,
    pub score: f64,
    pub recommend_count: u32,
}

/// Score one director over their published films in a contest.
///
/// Returns `None` when the director has no films, so nothing is ever divided
/// by zero and directors without films never reach the leaderboard.
pub fn score_creator(profile_id: i32, name: &str, films: &[FilmStats]) -> Option<CreatorScore> {
    if films.is_empty() {
        return None;
    }
    let n = films.len() as f64;

    let avg_jury = round2(films.iter().map(|f| f.jury_rating.unwrap_or(0.0)).sum::<f64>() / n);
    let avg_audience = round2(
        films
            .iter()
            .map(|f| f.audience_rating.unwrap_or(0.0))
            .sum::<f64>()
            / n,
    );

    let audience_recommends: u32 = films.iter().map(|f| f.audience_recommends).sum();
    let celeb_recommends: u32 = films.iter().map(|f| f.celeb_recommends).sum();
    let avg_audience_recommends = round2(f64::from(audience_recommends) / n);
    let avg_celeb_recommends = round2(f64::from(celeb_recommends) / n);

    let composite = avg_jury * RATING_WEIGHT
        + avg_audience * RATING_WEIGHT
        + (avg_audience_recommends * AUDIENCE_RECOMMEND_WEIGHT).min(RECOMMEND_BONUS_CAP)
        + (avg_celeb_recommends * CELEB_RECOMMEND_WEIGHT).min(RECOMMEND_BONUS_CAP);

    Some(CreatorScore {
        profile_id,
        name: name.to_owned(),
        avg_jury,
        avg_audience,
        avg_audience_recommends,
        avg_celeb_recommends,
        composite,
        score: round2(composite * SCORE_SCALE),
        recommend_count: audience_recommends + celeb_recommends,
    })
}

/// Order directors by score (descending), then name per `tie_break`, then
/// profile id, and number them from 1.
pub fn rank_creators(
    mut scores: Vec<CreatorScore>,
    tie_break: TieBreak,
) -> Vec<Ranked<CreatorScore>> {
    scores.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| tie_break.compare(&a.name, &b.name))
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });
    assign_positions(scores)
}

/// A non-celebrity curation list as seen by the curator scorer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CuratorList {
    pub profile_id: i32,
    pub movies: HashSet<i32>,
    pub likes: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CuratorScore {
    pub profile_id: i32,
    pub likes: u32,
    pub match_count: u32,
    /// Share of the celebrity pool this curator picked, 0-100.
    pub match_percent: f64,
    pub score: f64,
    pub recommend_count: u32,
}

/// Score a curator against the union of celebrity picks.
///
/// Without any overlap the score is the raw like count; once there is
/// overlap, likes are multiplied by the match percentage.
pub fn score_curator(list: &CuratorList, celeb_pool: &HashSet<i32>) -> CuratorScore {
    let match_count = list.movies.intersection(celeb_pool).count() as u32;
    let match_percent = if celeb_pool.is_empty() || match_count == 0 {
        0.0
    } else {
        round2(f64::from(match_count) / celeb_pool.len() as f64 * 100.0)
    };
    let score = if match_percent > 0.0 {
        round2(f64::from(list.likes) * match_percent)
    } else {
        f64::from(list.likes)
    };

    CuratorScore {
        profile_id: list.profile_id,
        likes: list.likes,
        match_count,
        match_percent,
        score,
        recommend_count: list.movies.len() as u32,
    }
}

/// Order curators by score (descending), then match, then profile id.
pub fn rank_curators(mut scores: Vec<CuratorScore>) -> Vec<Ranked<CuratorScore>> {
    scores.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.match_percent.total_cmp(&a.match_percent))
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });
    assign_positions(scores)
}
