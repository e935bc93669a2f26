use axum::Json;
use axum::extract::{Path, Query, State};
use common::{ContestState, MovieState};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{contest, movie};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::contest::*;
use crate::models::movie::MovieResponse;
use crate::models::shared::{PageQuery, Pagination, page_bounds, page_offset};
use crate::recommend::{self, Curator};
use crate::state::AppState;
use crate::utils::contest::find_contest;

#[utoipa::path(
    get,
    path = "/",
    tag = "Contests",
    operation_id = "listContests",
    summary = "List contests",
    description = "Returns a paginated list of contests, most recent start first. `live=true` keeps only contests that are live right now; `live=false` keeps only those that are not.",
    params(ContestListQuery),
    responses(
        (status = 200, description = "List of contests", body = ContestListResponse),
    ),
)]
#[instrument(skip(state, query), fields(live = ?query.live))]
pub async fn list_contests(
    State(state): State<AppState>,
    Query(query): Query<ContestListQuery>,
) -> Result<Json<ContestListResponse>, AppError> {
    let (page, per_page) = page_bounds(query.page, query.per_page);
    let now = state.clock.now();

    let mut select = contest::Entity::find();
    let in_window = Condition::all()
        .add(contest::Column::State.eq(ContestState::Live))
        .add(contest::Column::StartTime.lte(now))
        .add(contest::Column::EndTime.gte(now));
    match query.live {
        Some(true) => select = select.filter(in_window),
        Some(false) => select = select.filter(in_window.not()),
        None => {}
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = select
        .order_by_desc(contest::Column::StartTime)
        .order_by_asc(contest::Column::Id)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| ContestResponse::new(c, now))
        .collect();

    Ok(Json(ContestListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Contests",
    operation_id = "getContest",
    summary = "Get a contest by ID",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Contest details", body = ContestResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestResponse>, AppError> {
    let model = find_contest(&state.db, id).await?;
    Ok(Json(ContestResponse::new(model, state.clock.now())))
}

#[utoipa::path(
    get,
    path = "/{id}/movies",
    tag = "Contests",
    operation_id = "listContestMovies",
    summary = "List films taking part in a contest",
    description = "Published films entered in the contest, each with its recommend deadline.",
    params(("id" = i32, Path, description = "Contest ID"), PageQuery),
    responses(
        (status = 200, description = "Participating films", body = ContestMoviesResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(contest_id))]
pub async fn list_contest_movies(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ContestMoviesResponse>, AppError> {
    let (page, per_page) = page_bounds(query.page, query.per_page);
    let contest = find_contest(&state.db, contest_id).await?;

    let select = movie::Entity::find()
        .filter(movie::Column::ContestId.eq(contest.id))
        .filter(movie::Column::State.eq(MovieState::Published));
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = select
        .order_by_desc(movie::Column::PublishOn)
        .order_by_asc(movie::Column::Id)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| MovieResponse::new(m, Some(&contest)))
        .collect();

    Ok(Json(ContestMoviesResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/recommend",
    tag = "Contest Recommendations",
    operation_id = "getContestRecommendations",
    summary = "Size of the caller's curation list",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Curation list size", body = ContestRecommendResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id, user_id = auth_user.user_id))]
pub async fn get_contest_recommend(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
) -> Result<Json<ContestRecommendResponse>, AppError> {
    let summary = recommend::curation_summary(&state.db, auth_user.user_id, contest_id).await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    post,
    path = "/{id}/recommend",
    tag = "Contest Recommendations",
    operation_id = "addContestRecommendation",
    summary = "Add a film to the caller's curation list",
    description = "The contest must be live, the film must take part in it and still be inside its recommend window, and the list must have room. Adding a film already in the list is a no-op.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Film added", body = ContestRecommendResponse),
        (status = 400, description = "Rejected (VALIDATION_ERROR, NOT_ELIGIBLE, CAPACITY_EXCEEDED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(contest_id, user_id = auth_user.user_id, movie_id = payload.movie))]
pub async fn add_contest_recommend(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    AppJson(payload): AppJson<RecommendRequest>,
) -> Result<Json<ContestRecommendResponse>, AppError> {
    let curator = Curator {
        user_id: auth_user.user_id,
        username: &auth_user.username,
    };
    let summary = recommend::add_to_contest(
        &state.db,
        curator,
        contest_id,
        payload.movie,
        state.clock.now(),
    )
    .await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}/recommend",
    tag = "Contest Recommendations",
    operation_id = "removeContestRecommendation",
    summary = "Remove a film from the caller's curation list",
    description = "The contest must be live and the film must take part in it. Removing a film that is not in the list is a no-op.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Film removed", body = ContestRecommendResponse),
        (status = 400, description = "Rejected (VALIDATION_ERROR, NOT_ELIGIBLE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(contest_id, user_id = auth_user.user_id, movie_id = payload.movie))]
pub async fn remove_contest_recommend(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    AppJson(payload): AppJson<RecommendRequest>,
) -> Result<Json<ContestRecommendResponse>, AppError> {
    let curator = Curator {
        user_id: auth_user.user_id,
        username: &auth_user.username,
    };
    let summary = recommend::remove_from_contest(
        &state.db,
        curator,
        contest_id,
        payload.movie,
        state.clock.now(),
    )
    .await?;
    Ok(Json(summary.into()))
}
