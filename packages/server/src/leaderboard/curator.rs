use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::scoring::{CuratorList, rank_curators, score_curator};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::{error, info, instrument};

use super::{CurationList, JobReport, insert_batched, live_contests, load_curation_lists};
use crate::config::LeaderboardConfig;
use crate::entity::{contest, top_curator};

/// Recompute the Top Curators snapshot of every live contest.
#[instrument(skip(db, config))]
pub async fn run_top_curator_job(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    config: &LeaderboardConfig,
) -> anyhow::Result<JobReport> {
    let contests = live_contests(db, now).await?;
    let mut report = JobReport {
        contests: contests.len(),
        ..Default::default()
    };

    for contest in &contests {
        let outcome = refresh_contest(db, contest, now, config).await;
        if let Err(e) = &outcome {
            error!(contest_id = contest.id, error = %e, "Top curator refresh failed");
        }
        report.record(&outcome);
    }

    info!(
        contests = report.contests,
        succeeded = report.succeeded,
        failed = report.failed,
        rows = report.rows,
        "Top curator job finished"
    );
    Ok(report)
}

/// Split lists into the celebrity pick pool and the scoreable audience lists.
///
/// Audience lists whose owner has no profile are dropped: a snapshot row
/// must point at a profile.
fn partition(lists: Vec<CurationList>) -> (HashSet<i32>, Vec<CuratorList>) {
    let mut pool = HashSet::new();
    let mut audience = Vec::new();
    for list in lists {
        if list.is_celeb() {
            pool.extend(list.movies);
        } else if let Some((profile_id, _)) = list.profile {
            audience.push(CuratorList {
                profile_id,
                movies: list.movies,
                likes: list.likes,
            });
        }
    }
    (pool, audience)
}

async fn refresh_contest(
    db: &DatabaseConnection,
    contest: &contest::Model,
    now: DateTime<Utc>,
    config: &LeaderboardConfig,
) -> anyhow::Result<usize> {
    let (pool, audience) = partition(load_curation_lists(db, contest.id).await?);
    let ranked = rank_curators(audience.iter().map(|l| score_curator(l, &pool)).collect());

    let rows: Vec<top_curator::ActiveModel> = ranked
        .iter()
        .map(|r| top_curator::ActiveModel {
            profile_id: Set(r.entry.profile_id),
            contest_id: Set(contest.id),
            pos: Set(r.pos),
            score: Set(r.entry.score),
            match_percent: Set(r.entry.match_percent),
            likes_on_recommend: Set(i32::try_from(r.entry.likes).unwrap_or(i32::MAX)),
            recommend_count: Set(i32::try_from(r.entry.recommend_count).unwrap_or(i32::MAX)),
            created_at: Set(now),
            ..Default::default()
        })
        .collect();
    let inserted = rows.len();

    let txn = db.begin().await?;
    let deleted = top_curator::Entity::delete_many()
        .filter(top_curator::Column::ContestId.eq(contest.id))
        .exec(&txn)
        .await?;
    insert_batched(&txn, rows, config.insert_batch_size).await?;
    txn.commit().await?;

    info!(
        contest_id = contest.id,
        celeb_pool = pool.len(),
        deleted = deleted.rows_affected,
        inserted,
        "Replaced top curator snapshot"
    );
    Ok(inserted)
}
