use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use common::scoring::{FilmStats, rank_creators, score_creator};
use common::{DIRECTOR_ROLE, MovieState};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use tracing::{error, info, instrument};

use super::{JobReport, insert_batched, live_contests, load_curation_lists};
use crate::config::LeaderboardConfig;
use crate::entity::{contest, crew_member, crew_role, movie, profile, top_creator};

/// Directors of every scored movie, resolved once per run.
#[derive(Debug, Default)]
struct DirectorIndex {
    by_movie: HashMap<i32, Vec<i32>>,
    names: HashMap<i32, String>,
}

impl DirectorIndex {
    async fn load<C: ConnectionTrait>(conn: &C, movie_ids: Vec<i32>) -> Result<Self, DbErr> {
        let Some(role) = crew_role::Entity::find()
            .filter(crew_role::Column::Name.eq(DIRECTOR_ROLE))
            .one(conn)
            .await?
        else {
            return Ok(Self::default());
        };
        if movie_ids.is_empty() {
            return Ok(Self::default());
        }

        let credits: Vec<(i32, i32)> = crew_member::Entity::find()
            .select_only()
            .column(crew_member::Column::MovieId)
            .column(crew_member::Column::ProfileId)
            .filter(crew_member::Column::RoleId.eq(role.id))
            .filter(crew_member::Column::MovieId.is_in(movie_ids))
            .into_tuple()
            .all(conn)
            .await?;

        let mut by_movie: HashMap<i32, Vec<i32>> = HashMap::new();
        for (movie_id, profile_id) in &credits {
            by_movie.entry(*movie_id).or_default().push(*profile_id);
        }

        let mut profile_ids: Vec<i32> = credits.iter().map(|(_, p)| *p).collect();
        profile_ids.sort_unstable();
        profile_ids.dedup();
        let names = profile::Entity::find()
            .select_only()
            .column(profile::Column::Id)
            .column(profile::Column::Name)
            .filter(profile::Column::Id.is_in(profile_ids))
            .into_tuple::<(i32, String)>()
            .all(conn)
            .await?
            .into_iter()
            .collect();

        Ok(Self { by_movie, names })
    }

    fn directors_of(&self, movie_id: i32) -> &[i32] {
        self.by_movie
            .get(&movie_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn name(&self, profile_id: i32) -> &str {
        self.names.get(&profile_id).map_or("", String::as_str)
    }
}

/// Recompute the Top Creators snapshot of every live contest.
#[instrument(skip(db, config))]
pub async fn run_top_creator_job(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    config: &LeaderboardConfig,
) -> anyhow::Result<JobReport> {
    let contests = live_contests(db, now).await?;
    let mut report = JobReport {
        contests: contests.len(),
        ..Default::default()
    };
    if contests.is_empty() {
        info!("No live contests, skipping top creators");
        return Ok(report);
    }

    let contest_ids: Vec<i32> = contests.iter().map(|c| c.id).collect();
    let movies = movie::Entity::find()
        .filter(movie::Column::State.eq(MovieState::Published))
        .filter(movie::Column::ContestId.is_in(contest_ids))
        .all(db)
        .await?;
    let directors = DirectorIndex::load(db, movies.iter().map(|m| m.id).collect()).await?;

    let mut by_contest: HashMap<i32, Vec<movie::Model>> = HashMap::new();
    for m in movies {
        if let Some(contest_id) = m.contest_id {
            by_contest.entry(contest_id).or_default().push(m);
        }
    }

    for contest in &contests {
        let films = by_contest.remove(&contest.id).unwrap_or_default();
        let outcome = refresh_contest(db, contest, &films, &directors, now, config).await;
        if let Err(e) = &outcome {
            error!(contest_id = contest.id, error = %e, "Top creator refresh failed");
        }
        report.record(&outcome);
    }

    info!(
        contests = report.contests,
        succeeded = report.succeeded,
        failed = report.failed,
        rows = report.rows,
        "Top creator job finished"
    );
    Ok(report)
}

async fn refresh_contest(
    db: &DatabaseConnection,
    contest: &contest::Model,
    films: &[movie::Model],
    directors: &DirectorIndex,
    now: DateTime<Utc>,
    config: &LeaderboardConfig,
) -> anyhow::Result<usize> {
    let lists = load_curation_lists(db, contest.id).await?;
    let mut audience: HashMap<i32, u32> = HashMap::new();
    let mut celeb: HashMap<i32, u32> = HashMap::new();
    for list in &lists {
        let tally = if list.is_celeb() {
            &mut celeb
        } else {
            &mut audience
        };
        for movie_id in &list.movies {
            *tally.entry(*movie_id).or_default() += 1;
        }
    }

    let mut per_director: BTreeMap<i32, Vec<FilmStats>> = BTreeMap::new();
    for film in films {
        let stats = FilmStats {
            jury_rating: film.jury_rating,
            audience_rating: film.audience_rating,
            audience_recommends: audience.get(&film.id).copied().unwrap_or(0),
            celeb_recommends: celeb.get(&film.id).copied().unwrap_or(0),
        };
        for &profile_id in directors.directors_of(film.id) {
            per_director
                .entry(profile_id)
                .or_default()
                .push(stats.clone());
        }
    }

    let scores = per_director
        .iter()
        .filter_map(|(&profile_id, stats)| {
            score_creator(profile_id, directors.name(profile_id), stats)
        })
        .collect();
    let ranked = rank_creators(scores, config.creator_tie_break);

    let rows: Vec<top_creator::ActiveModel> = ranked
        .iter()
        .map(|r| top_creator::ActiveModel {
            profile_id: Set(r.entry.profile_id),
            contest_id: Set(contest.id),
            pos: Set(r.pos),
            score: Set(r.entry.score),
            recommend_count: Set(i32::try_from(r.entry.recommend_count).unwrap_or(i32::MAX)),
            created_at: Set(now),
            ..Default::default()
        })
        .collect();
    let inserted = rows.len();

    let txn = db.begin().await?;
    let deleted = top_creator::Entity::delete_many()
        .filter(top_creator::Column::ContestId.eq(contest.id))
        .exec(&txn)
        .await?;
    insert_batched(&txn, rows, config.insert_batch_size).await?;
    txn.commit().await?;

    info!(
        contest_id = contest.id,
        films = films.len(),
        directors = ranked.len(),
        deleted = deleted.rows_affected,
        inserted,
        "Replaced top creator snapshot"
    );
    Ok(inserted)
}
