//! Adding films to and removing them from users' recommendation lists.

pub mod lists;

use chrono::{DateTime, Utc};
use common::MovieState;
use sea_orm::prelude::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{debug, instrument};

use crate::entity::{contest, movie};
use crate::error::AppError;
use crate::utils::contest::{find_contest, find_movie, find_movie_list};

pub use lists::ListStore;

/// The caller's curation list size in one contest.
#[derive(Debug, Clone)]
pub struct CurationSummary {
    pub contest: contest::Model,
    pub recommended: u64,
}

/// Who is acting. Only the id and username from the bearer token are needed.
#[derive(Debug, Clone, Copy)]
pub struct Curator<'a> {
    pub user_id: i32,
    pub username: &'a str,
}

pub fn not_live() -> AppError {
    AppError::NotEligible("Contest is not live".into())
}

pub fn not_participating() -> AppError {
    AppError::NotEligible("Film hasn't participated in this contest".into())
}

pub fn window_elapsed(contest: &contest::Model) -> AppError {
    AppError::NotEligible(format!(
        "Films in {} contest can be recommended only within {} days of their release date",
        contest.name, contest.days_per_movie
    ))
}

pub fn list_full(contest: &contest::Model) -> AppError {
    AppError::CapacityExceeded(format!(
        "You can only recommended {} films for {} contest",
        contest.max_recommends, contest.name
    ))
}

async fn bump_recommend_count<C: ConnectionTrait>(conn: &C, movie_id: i32) -> Result<(), DbErr> {
    movie::Entity::update_many()
        .col_expr(
            movie::Column::RecommendCount,
            Expr::cust("recommend_count + 1"),
        )
        .filter(movie::Column::Id.eq(movie_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn drop_recommend_count<C: ConnectionTrait>(conn: &C, movie_id: i32) -> Result<(), DbErr> {
    movie::Entity::update_many()
        .col_expr(
            movie::Column::RecommendCount,
            Expr::cust("GREATEST(recommend_count - 1, 0)"),
        )
        .filter(movie::Column::Id.eq(movie_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// The contest a film is entered in, if any.
pub async fn movie_contest<C: ConnectionTrait>(
    conn: &C,
    movie: &movie::Model,
) -> Result<Option<contest::Model>, DbErr> {
    match movie.contest_id {
        Some(contest_id) => contest::Entity::find_by_id(contest_id).one(conn).await,
        None => Ok(None),
    }
}

/// Add a capped curation-list entry after checking capacity under the list lock.
///
/// Returns whether the film was newly added.
async fn add_to_curation_list<C: ConnectionTrait>(
    store: &ListStore<'_, C>,
    user_id: i32,
    contest: &contest::Model,
    movie_id: i32,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let list = store.curation_list_for_update(user_id, contest, now).await?;
    if store.contains(list.id, movie_id).await? {
        return Ok(false);
    }
    let size = store.size(list.id).await?;
    if size >= u64::try_from(contest.max_recommends).unwrap_or(0) {
        return Err(list_full(contest));
    }
    Ok(store.insert_movie(list.id, movie_id, now).await?)
}

/// Recommend a film from anywhere on the site.
///
/// A contest-live film still inside its recommend window also lands in the
/// caller's curation list for that contest; every film lands in the global
/// list. Both writes commit together or not at all. `recommend_count` only
/// moves when the curation list gains the film.
#[instrument(skip(db, curator), fields(user_id = curator.user_id))]
pub async fn recommend(
    db: &DatabaseConnection,
    curator: Curator<'_>,
    movie_id: i32,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let txn = db.begin().await?;
    let store = ListStore::new(&txn);
    store
        .ensure_owner(curator.user_id, curator.username, now)
        .await?;

    let movie = find_movie(&txn, movie_id).await?;
    let mut picked = false;

    if let Some(contest) = movie_contest(&txn, &movie).await?
        && movie.is_contest_live(&contest, now)
        && movie.is_recommend_eligible(&contest, now)
    {
        picked = add_to_curation_list(&store, curator.user_id, &contest, movie.id, now).await?;
    }

    let global = store.global_list_for_update(curator.user_id, now).await?;
    store.insert_movie(global.id, movie.id, now).await?;

    // The counter tracks curation picks only.
    if picked {
        bump_recommend_count(&txn, movie.id).await?;
    }
    txn.commit().await?;

    debug!(picked, "Recommend processed");
    Ok(())
}

/// Withdraw a recommendation made through [`recommend`]. Absent films are a no-op.
#[instrument(skip(db, curator), fields(user_id = curator.user_id))]
pub async fn unrecommend(
    db: &DatabaseConnection,
    curator: Curator<'_>,
    movie_id: i32,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let txn = db.begin().await?;
    let store = ListStore::new(&txn);

    let movie = find_movie(&txn, movie_id).await?;
    let mut unpicked = false;

    if let Some(contest) = movie_contest(&txn, &movie).await?
        && movie.is_contest_live(&contest, now)
        && let Some(list) = store.find_curation_list(curator.user_id, contest.id).await?
    {
        unpicked = store.remove_movie(list.id, movie.id).await?;
    }

    if let Some(global) = store.find_global_list(curator.user_id).await? {
        store.remove_movie(global.id, movie.id).await?;
    }

    if unpicked {
        drop_recommend_count(&txn, movie.id).await?;
    }
    txn.commit().await?;

    debug!(unpicked, "Unrecommend processed");
    Ok(())
}

/// Size of the caller's curation list in a contest; 0 before the first pick.
pub async fn curation_summary<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    contest_id: i32,
) -> Result<CurationSummary, AppError> {
    let contest = find_contest(conn, contest_id).await?;
    let store = ListStore::new(conn);
    let recommended = match store.find_curation_list(user_id, contest.id).await? {
        Some(list) => store.size(list.id).await?,
        None => 0,
    };
    Ok(CurationSummary {
        contest,
        recommended,
    })
}

/// A published film entered in `contest`, or the participation rejection.
async fn participating_movie<C: ConnectionTrait>(
    conn: &C,
    contest: &contest::Model,
    movie_id: i32,
) -> Result<movie::Model, AppError> {
    movie::Entity::find_by_id(movie_id)
        .filter(movie::Column::ContestId.eq(contest.id))
        .filter(movie::Column::State.eq(MovieState::Published))
        .one(conn)
        .await?
        .ok_or_else(not_participating)
}

/// Add a film to the caller's curation list for one contest.
#[instrument(skip(db, curator), fields(user_id = curator.user_id))]
pub async fn add_to_contest(
    db: &DatabaseConnection,
    curator: Curator<'_>,
    contest_id: i32,
    movie_id: i32,
    now: DateTime<Utc>,
) -> Result<CurationSummary, AppError> {
    let txn = db.begin().await?;
    let contest = find_contest(&txn, contest_id).await?;
    if !contest.is_live(now) {
        return Err(not_live());
    }
    let movie = participating_movie(&txn, &contest, movie_id).await?;
    if !movie.is_recommend_eligible(&contest, now) {
        return Err(window_elapsed(&contest));
    }

    let store = ListStore::new(&txn);
    store
        .ensure_owner(curator.user_id, curator.username, now)
        .await?;
    if add_to_curation_list(&store, curator.user_id, &contest, movie.id, now).await? {
        bump_recommend_count(&txn, movie.id).await?;
    }

    let recommended = match store.find_curation_list(curator.user_id, contest.id).await? {
        Some(list) => store.size(list.id).await?,
        None => 0,
    };
    txn.commit().await?;

    Ok(CurationSummary {
        contest,
        recommended,
    })
}

/// Remove a film from the caller's curation list for one contest.
#[instrument(skip(db, curator), fields(user_id = curator.user_id))]
pub async fn remove_from_contest(
    db: &DatabaseConnection,
    curator: Curator<'_>,
    contest_id: i32,
    movie_id: i32,
    now: DateTime<Utc>,
) -> Result<CurationSummary, AppError> {
    let txn = db.begin().await?;
    let contest = find_contest(&txn, contest_id).await?;
    if !contest.is_live(now) {
        return Err(not_live());
    }
    let movie = participating_movie(&txn, &contest, movie_id).await?;

    let store = ListStore::new(&txn);
    let recommended = match store.find_curation_list(curator.user_id, contest.id).await? {
        Some(list) => {
            if store.remove_movie(list.id, movie.id).await? {
                drop_recommend_count(&txn, movie.id).await?;
            }
            store.size(list.id).await?
        }
        None => 0,
    };
    txn.commit().await?;

    Ok(CurationSummary {
        contest,
        recommended,
    })
}

/// Like a list; returns the list's like count afterwards.
#[instrument(skip(db, curator), fields(user_id = curator.user_id))]
pub async fn like_list(
    db: &DatabaseConnection,
    curator: Curator<'_>,
    list_id: i32,
    now: DateTime<Utc>,
) -> Result<u64, AppError> {
    let txn = db.begin().await?;
    find_movie_list(&txn, list_id).await?;

    let store = ListStore::new(&txn);
    store
        .ensure_owner(curator.user_id, curator.username, now)
        .await?;
    store.insert_like(list_id, curator.user_id, now).await?;
    let likes = store.like_count(list_id).await?;
    txn.commit().await?;
    Ok(likes)
}

/// Remove a like; returns the list's like count afterwards.
#[instrument(skip(db, curator), fields(user_id = curator.user_id))]
pub async fn unlike_list(
    db: &DatabaseConnection,
    curator: Curator<'_>,
    list_id: i32,
) -> Result<u64, AppError> {
    find_movie_list(db, list_id).await?;

    let store = ListStore::new(db);
    store.remove_like(list_id, curator.user_id).await?;
    Ok(store.like_count(list_id).await?)
}
