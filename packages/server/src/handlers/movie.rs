use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::movie::MovieResponse;
use crate::recommend::{self, Curator};
use crate::state::AppState;
use crate::utils::contest::find_movie;

async fn movie_response(state: &AppState, id: i32) -> Result<MovieResponse, AppError> {
    let movie = find_movie(&state.db, id).await?;
    let contest = recommend::movie_contest(&state.db, &movie).await?;
    Ok(MovieResponse::new(movie, contest.as_ref()))
}

#[utoipa::path(
    put,
    path = "/{id}/recommend",
    tag = "Movies",
    operation_id = "recommendMovie",
    summary = "Recommend a film",
    description = "Adds the film to the caller's global \"Recommendation\" list. A film that is contest-live and still inside its recommend window also joins the caller's curation list for that contest; if that list is full nothing is changed. Repeating the call is a no-op.",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Film recommended", body = MovieResponse),
        (status = 400, description = "Curation list full (CAPACITY_EXCEEDED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Movie not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn recommend_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MovieResponse>, AppError> {
    let curator = Curator {
        user_id: auth_user.user_id,
        username: &auth_user.username,
    };
    recommend::recommend(&state.db, curator, id, state.clock.now()).await?;
    Ok(Json(movie_response(&state, id).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}/recommend",
    tag = "Movies",
    operation_id = "unrecommendMovie",
    summary = "Withdraw a recommendation",
    description = "Removes the film from the caller's global list and, while its contest is live, from the caller's curation list. Removing a film that was never recommended is a no-op.",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Recommendation withdrawn", body = MovieResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Movie not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn unrecommend_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MovieResponse>, AppError> {
    let curator = Curator {
        user_id: auth_user.user_id,
        username: &auth_user.username,
    };
    recommend::unrecommend(&state.db, curator, id, state.clock.now()).await?;
    Ok(Json(movie_response(&state, id).await?))
}
