//! Batch recomputation of the per-contest leaderboards.
//!
//! Each run scans the contests live at `now`, scores them in memory and
//! swaps every contest's snapshot inside its own transaction. A failing
//! contest is logged and counted; the others still get refreshed.

pub mod creator;
pub mod curator;
pub mod query;
pub mod scheduler;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use common::ContestState;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use serde::Serialize;

use crate::entity::{contest, movie_list, movie_list_like, movie_list_movie, profile};

pub use creator::run_top_creator_job;
pub use curator::run_top_curator_job;

/// Which snapshot a refresh targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    TopCreators,
    TopCurators,
}

impl Board {
    pub const ALL: &'static [Board] = &[Self::TopCreators, Self::TopCurators];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopCreators => "top-creators",
            Self::TopCurators => "top-curators",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("Unknown leaderboard '{s}'"))
    }
}

/// Outcome of one scorer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct JobReport {
    /// Live contests found at the start of the run.
    #[schema(example = 3)]
    pub contests: usize,
    #[schema(example = 3)]
    pub succeeded: usize,
    #[schema(example = 0)]
    pub failed: usize,
    /// Snapshot rows written across all contests.
    #[schema(example = 42)]
    pub rows: usize,
}

impl JobReport {
    fn record(&mut self, outcome: &anyhow::Result<usize>) {
        match outcome {
            Ok(rows) => {
                self.succeeded += 1;
                self.rows += rows;
            }
            Err(_) => self.failed += 1,
        }
    }
}

/// Contests in the `Live` state whose window contains `now`.
pub async fn live_contests<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> Result<Vec<contest::Model>, DbErr> {
    contest::Entity::find()
        .filter(contest::Column::State.eq(ContestState::Live))
        .filter(contest::Column::StartTime.lte(now))
        .filter(contest::Column::EndTime.gte(now))
        .all(conn)
        .await
}

/// A contest curation list with its owner and contents resolved.
#[derive(Debug, Clone)]
pub(crate) struct CurationList {
    /// Owner's profile id and celebrity flag, when the owner has a profile.
    pub profile: Option<(i32, bool)>,
    pub movies: HashSet<i32>,
    pub likes: u32,
}

impl CurationList {
    pub fn is_celeb(&self) -> bool {
        self.profile.is_some_and(|(_, celeb)| celeb)
    }
}

/// Load every curation list of a contest with members, likes and owner flags.
pub(crate) async fn load_curation_lists<C: ConnectionTrait>(
    conn: &C,
    contest_id: i32,
) -> Result<Vec<CurationList>, DbErr> {
    let lists = movie_list::Entity::find()
        .filter(movie_list::Column::ContestId.eq(contest_id))
        .all(conn)
        .await?;
    if lists.is_empty() {
        return Ok(Vec::new());
    }

    let list_ids: Vec<i32> = lists.iter().map(|l| l.id).collect();
    let owner_ids: Vec<i32> = lists.iter().map(|l| l.owner_id).collect();

    let owners: HashMap<i32, (i32, bool)> = profile::Entity::find()
        .filter(profile::Column::UserId.is_in(owner_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (p.user_id, (p.id, p.is_celeb)))
        .collect();

    let entries: Vec<(i32, i32)> = movie_list_movie::Entity::find()
        .select_only()
        .column(movie_list_movie::Column::ListId)
        .column(movie_list_movie::Column::MovieId)
        .filter(movie_list_movie::Column::ListId.is_in(list_ids.clone()))
        .into_tuple()
        .all(conn)
        .await?;
    let mut members: HashMap<i32, HashSet<i32>> = HashMap::new();
    for (list_id, movie_id) in entries {
        members.entry(list_id).or_default().insert(movie_id);
    }

    let liked: Vec<i32> = movie_list_like::Entity::find()
        .select_only()
        .column(movie_list_like::Column::ListId)
        .filter(movie_list_like::Column::ListId.is_in(list_ids))
        .into_tuple()
        .all(conn)
        .await?;
    let mut likes: HashMap<i32, u32> = HashMap::new();
    for list_id in liked {
        *likes.entry(list_id).or_default() += 1;
    }

    Ok(lists
        .into_iter()
        .map(|list| CurationList {
            profile: owners.get(&list.owner_id).copied(),
            movies: members.remove(&list.id).unwrap_or_default(),
            likes: likes.get(&list.id).copied().unwrap_or(0),
        })
        .collect())
}

/// Insert snapshot rows `batch_size` at a time.
pub(crate) async fn insert_batched<E, A, C>(
    conn: &C,
    rows: Vec<A>,
    batch_size: usize,
) -> Result<(), DbErr>
where
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E> + Send,
    C: ConnectionTrait,
{
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<A> = rows.by_ref().take(batch_size.max(1)).collect();
        E::insert_many(chunk).exec_without_returning(conn).await?;
    }
    Ok(())
}
