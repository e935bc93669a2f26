use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::RECOMMENDATION_LIST_NAME;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{movie_list, movie_list_like, movie_list_movie, profile, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::movie_list::*;
use crate::models::shared::{Pagination, ProfileSummary, page_bounds, page_offset};
use crate::recommend::{self, Curator, ListStore};
use crate::state::AppState;
use crate::utils::contest::find_movie_list;

/// Count rows per list for the given list ids.
async fn count_by_list<C, E>(
    conn: &C,
    column: E::Column,
    list_ids: Vec<i32>,
) -> Result<HashMap<i32, u64>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let ids: Vec<i32> = E::find()
        .select_only()
        .column(column)
        .filter(column.is_in(list_ids))
        .into_tuple()
        .all(conn)
        .await?;
    let mut counts = HashMap::new();
    for id in ids {
        *counts.entry(id).or_default() += 1;
    }
    Ok(counts)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Movie Lists",
    operation_id = "listMovieLists",
    summary = "List recommendation lists",
    description = "Paginated lists, newest first unless `sort_by` names `likes` or `movies`. Global \"Recommendation\" lists are left out unless `include_global=true`.",
    params(MovieListQuery),
    responses(
        (status = 200, description = "Lists", body = MovieListListResponse),
        (status = 400, description = "Unknown sort field (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_movie_lists(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> Result<Json<MovieListListResponse>, AppError> {
    let (page, per_page) = page_bounds(query.page, query.per_page);

    let mut select = movie_list::Entity::find();
    if let Some(owner_id) = query.owner_id {
        select = select.filter(movie_list::Column::OwnerId.eq(owner_id));
    }
    if let Some(contest_id) = query.contest_id {
        select = select.filter(movie_list::Column::ContestId.eq(contest_id));
    }
    if !query.include_global.unwrap_or(false) {
        select = select.filter(
            Condition::any()
                .add(movie_list::Column::ContestId.is_not_null())
                .add(movie_list::Column::Name.ne(RECOMMENDATION_LIST_NAME)),
        );
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let sort_order = if query.sort_order.as_deref() == Some("asc") {
        Order::Asc
    } else {
        Order::Desc
    };
    select = match query.sort_by.as_deref().unwrap_or("created_at") {
        "created_at" => select.order_by(movie_list::Column::CreatedAt, sort_order.clone()),
        "likes" => select.order_by(
            Expr::cust(
                "(SELECT COUNT(*) FROM movie_list_like \
                 WHERE movie_list_like.list_id = movie_list.id)",
            ),
            sort_order.clone(),
        ),
        "movies" => select.order_by(
            Expr::cust(
                "(SELECT COUNT(*) FROM movie_list_movie \
                 WHERE movie_list_movie.list_id = movie_list.id)",
            ),
            sort_order.clone(),
        ),
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, likes, movies".into(),
            ));
        }
    };

    let lists = select
        .order_by(movie_list::Column::Id, sort_order)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let list_ids: Vec<i32> = lists.iter().map(|l| l.id).collect();
    let movies = count_by_list::<_, movie_list_movie::Entity>(
        &state.db,
        movie_list_movie::Column::ListId,
        list_ids.clone(),
    )
    .await?;
    let likes = count_by_list::<_, movie_list_like::Entity>(
        &state.db,
        movie_list_like::Column::ListId,
        list_ids,
    )
    .await?;

    let data = lists
        .into_iter()
        .map(|l| {
            let movies_count = movies.get(&l.id).copied().unwrap_or(0);
            let like_count = likes.get(&l.id).copied().unwrap_or(0);
            MovieListSummary::new(l, movies_count, like_count)
        })
        .collect();

    Ok(Json(MovieListListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Movie Lists",
    operation_id = "getMovieList",
    summary = "Get a recommendation list",
    params(("id" = i32, Path, description = "Movie list ID")),
    responses(
        (status = 200, description = "List details", body = MovieListResponse),
        (status = 404, description = "Movie list not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_movie_list(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MovieListResponse>, AppError> {
    let list = find_movie_list(&state.db, id).await?;

    let owner = user::Entity::find_by_id(list.owner_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("List {} has no owner", list.id)))?;
    let owner_profile = profile::Entity::find()
        .filter(profile::Column::UserId.eq(owner.id))
        .one(&state.db)
        .await?;

    let movies: Vec<i32> = movie_list_movie::Entity::find()
        .select_only()
        .column(movie_list_movie::Column::MovieId)
        .filter(movie_list_movie::Column::ListId.eq(list.id))
        .order_by_asc(movie_list_movie::Column::AddedAt)
        .order_by_asc(movie_list_movie::Column::MovieId)
        .into_tuple()
        .all(&state.db)
        .await?;
    let like_count = ListStore::new(&state.db).like_count(list.id).await?;

    Ok(Json(MovieListResponse {
        id: list.id,
        name: list.name,
        frozen: list.frozen,
        contest_id: list.contest_id,
        owner: ListOwner {
            user_id: owner.id,
            username: owner.username,
            profile: owner_profile.map(ProfileSummary::from),
        },
        movies_count: movies.len() as u64,
        movies,
        like_count,
        created_at: list.created_at,
    }))
}

#[utoipa::path(
    put,
    path = "/{id}/like",
    tag = "Movie Lists",
    operation_id = "likeMovieList",
    summary = "Like a list",
    description = "Idempotent: liking a list twice keeps one like.",
    params(("id" = i32, Path, description = "Movie list ID")),
    responses(
        (status = 200, description = "Liked", body = LikeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Movie list not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn like_movie_list(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LikeResponse>, AppError> {
    let curator = Curator {
        user_id: auth_user.user_id,
        username: &auth_user.username,
    };
    let like_count = recommend::like_list(&state.db, curator, id, state.clock.now()).await?;
    Ok(Json(LikeResponse {
        success: true,
        like_count,
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}/like",
    tag = "Movie Lists",
    operation_id = "unlikeMovieList",
    summary = "Remove a like",
    description = "Idempotent: unliking a list that was not liked is a no-op.",
    params(("id" = i32, Path, description = "Movie list ID")),
    responses(
        (status = 200, description = "Like removed", body = LikeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Movie list not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn unlike_movie_list(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LikeResponse>, AppError> {
    let curator = Curator {
        user_id: auth_user.user_id,
        username: &auth_user.username,
    };
    let like_count = recommend::unlike_list(&state.db, curator, id).await?;
    Ok(Json(LikeResponse {
        success: true,
        like_count,
    }))
}
