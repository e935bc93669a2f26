use axum::Json;
use axum::extract::{Path, State};
use tracing::{info, instrument};

use crate::crew;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::leaderboard::{Board, run_top_creator_job, run_top_curator_job};
use crate::models::admin::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/leaderboards/{board}/refresh",
    tag = "Admin",
    operation_id = "refreshLeaderboard",
    summary = "Recompute a leaderboard now",
    description = "Runs one scorer pass over every live contest and replaces their snapshots. Requires `leaderboard:refresh` permission.",
    params(("board" = String, Path, description = "`top-creators` or `top-curators`")),
    responses(
        (status = 200, description = "Job report", body = RefreshResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown leaderboard (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Job failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(board, user_id = auth_user.user_id))]
pub async fn refresh_leaderboard(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> Result<Json<RefreshResponse>, AppError> {
    auth_user.require_permission("leaderboard:refresh")?;
    let board: Board = board.parse().map_err(AppError::NotFound)?;

    let now = state.clock.now();
    let config = &state.config.leaderboard;
    let report = match board {
        Board::TopCreators => run_top_creator_job(&state.db, now, config).await,
        Board::TopCurators => run_top_curator_job(&state.db, now, config).await,
    }
    .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(%board, rows = report.rows, "Leaderboard refreshed on demand");
    Ok(Json(RefreshResponse {
        board: board.to_string(),
        report,
    }))
}

#[utoipa::path(
    post,
    path = "/crew-requests/{id}/approve",
    tag = "Admin",
    operation_id = "approveCrewRequest",
    summary = "Approve a crew request",
    description = "Marks the request approved and credits the requester on the film in the requested role. Requires `crew:manage` permission.",
    params(("id" = i32, Path, description = "Crew request ID")),
    responses(
        (status = 200, description = "Request approved", body = CrewRequestResponse),
        (status = 400, description = "Requester has no profile (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Request not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already decided (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn approve_crew_request(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CrewRequestResponse>, AppError> {
    auth_user.require_permission("crew:manage")?;
    let (request, member) = crew::approve_crew_request(&state.db, id, state.clock.now()).await?;
    Ok(Json(CrewRequestResponse::new(request, Some(member))))
}

#[utoipa::path(
    post,
    path = "/crew-requests/{id}/decline",
    tag = "Admin",
    operation_id = "declineCrewRequest",
    summary = "Decline a crew request",
    description = "Requires `crew:manage` permission.",
    params(("id" = i32, Path, description = "Crew request ID")),
    responses(
        (status = 200, description = "Request declined", body = CrewRequestResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Request not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already decided (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn decline_crew_request(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CrewRequestResponse>, AppError> {
    auth_user.require_permission("crew:manage")?;
    let request = crew::decline_crew_request(&state.db, id, state.clock.now()).await?;
    Ok(Json(CrewRequestResponse::new(request, None)))
}
