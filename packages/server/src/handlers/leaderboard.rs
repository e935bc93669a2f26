use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::leaderboard::query;
use crate::models::leaderboard::*;
use crate::models::shared::{PageQuery, Pagination, page_bounds};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}/top-creators",
    tag = "Leaderboards",
    operation_id = "listTopCreators",
    summary = "Top Creators of a contest",
    description = "Directors from the latest snapshot, ordered by position.",
    params(("id" = i32, Path, description = "Contest ID"), PageQuery),
    responses(
        (status = 200, description = "Snapshot page", body = TopCreatorListResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(contest_id))]
pub async fn list_top_creators(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TopCreatorListResponse>, AppError> {
    let (page, per_page) = page_bounds(query.page, query.per_page);
    let snapshot = query::top_creators(&state.db, contest_id, page, per_page).await?;

    Ok(Json(TopCreatorListResponse {
        data: snapshot
            .rows
            .into_iter()
            .map(|(row, profile)| TopCreatorResponse::new(row, profile))
            .collect(),
        pagination: Pagination::new(page, per_page, snapshot.total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/top-curators",
    tag = "Leaderboards",
    operation_id = "listTopCurators",
    summary = "Top Curators of a contest",
    description = "Curators from the latest snapshot, ordered by position. `match` is the share of celebrity picks the curator also picked.",
    params(("id" = i32, Path, description = "Contest ID"), PageQuery),
    responses(
        (status = 200, description = "Snapshot page", body = TopCuratorListResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(contest_id))]
pub async fn list_top_curators(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TopCuratorListResponse>, AppError> {
    let (page, per_page) = page_bounds(query.page, query.per_page);
    let snapshot = query::top_curators(&state.db, contest_id, page, per_page).await?;

    Ok(Json(TopCuratorListResponse {
        data: snapshot
            .rows
            .into_iter()
            .map(|(row, profile)| TopCuratorResponse::new(row, profile))
            .collect(),
        pagination: Pagination::new(page, per_page, snapshot.total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/my-creator-position",
    tag = "Leaderboards",
    operation_id = "getMyCreatorPosition",
    summary = "The caller's Top Creators row",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Caller's row", body = TopCreatorResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Contest not found or caller not ranked (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id, user_id = auth_user.user_id))]
pub async fn my_creator_position(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
) -> Result<Json<TopCreatorResponse>, AppError> {
    let (row, profile) =
        query::my_creator_position(&state.db, contest_id, auth_user.user_id).await?;
    Ok(Json(TopCreatorResponse::new(row, Some(profile))))
}

#[utoipa::path(
    get,
    path = "/{id}/my-curator-position",
    tag = "Leaderboards",
    operation_id = "getMyCuratorPosition",
    summary = "The caller's Top Curators row",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Caller's row", body = TopCuratorResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Contest not found or caller not ranked (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id, user_id = auth_user.user_id))]
pub async fn my_curator_position(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
) -> Result<Json<TopCuratorResponse>, AppError> {
    let (row, profile) =
        query::my_curator_position(&state.db, contest_id, auth_user.user_id).await?;
    Ok(Json(TopCuratorResponse::new(row, Some(profile))))
}
