use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entity::{profile, top_creator, top_curator};
use crate::error::AppError;
use crate::models::shared::page_offset;
use crate::utils::contest::{find_contest, find_profile_by_user};

const NOT_PARTICIPATED: &str = "You haven't participated in this contest";

/// One page of a snapshot plus the total row count.
pub struct SnapshotPage<T> {
    pub rows: Vec<(T, Option<profile::Model>)>,
    pub total: u64,
}

pub async fn top_creators<C: ConnectionTrait>(
    conn: &C,
    contest_id: i32,
    page: u64,
    per_page: u64,
) -> Result<SnapshotPage<top_creator::Model>, AppError> {
    find_contest(conn, contest_id).await?;

    let select = top_creator::Entity::find().filter(top_creator::Column::ContestId.eq(contest_id));
    let total = select.clone().paginate(conn, per_page).num_items().await?;
    let rows = select
        .find_also_related(profile::Entity)
        .order_by_asc(top_creator::Column::Pos)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(conn)
        .await?;

    Ok(SnapshotPage { rows, total })
}

pub async fn top_curators<C: ConnectionTrait>(
    conn: &C,
    contest_id: i32,
    page: u64,
    per_page: u64,
) -> Result<SnapshotPage<top_curator::Model>, AppError> {
    find_contest(conn, contest_id).await?;

    let select = top_curator::Entity::find().filter(top_curator::Column::ContestId.eq(contest_id));
    let total = select.clone().paginate(conn, per_page).num_items().await?;
    let rows = select
        .find_also_related(profile::Entity)
        .order_by_asc(top_curator::Column::Pos)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(conn)
        .await?;

    Ok(SnapshotPage { rows, total })
}

/// The caller's Top Creators row in a contest.
pub async fn my_creator_position<C: ConnectionTrait>(
    conn: &C,
    contest_id: i32,
    user_id: i32,
) -> Result<(top_creator::Model, profile::Model), AppError> {
    find_contest(conn, contest_id).await?;
    let me = find_profile_by_user(conn, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_PARTICIPATED.into()))?;

    let row = top_creator::Entity::find()
        .filter(top_creator::Column::ContestId.eq(contest_id))
        .filter(top_creator::Column::ProfileId.eq(me.id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_PARTICIPATED.into()))?;
    Ok((row, me))
}

/// The caller's Top Curators row in a contest.
pub async fn my_curator_position<C: ConnectionTrait>(
    conn: &C,
    contest_id: i32,
    user_id: i32,
) -> Result<(top_curator::Model, profile::Model), AppError> {
    find_contest(conn, contest_id).await?;
    let me = find_profile_by_user(conn, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_PARTICIPATED.into()))?;

    let row = top_curator::Entity::find()
        .filter(top_curator::Column::ContestId.eq(contest_id))
        .filter(top_curator::Column::ProfileId.eq(me.id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_PARTICIPATED.into()))?;
    Ok((row, me))
}
