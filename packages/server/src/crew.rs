//! Deciding requests to be credited as crew on a film.

use chrono::{DateTime, Utc};
use common::CrewRequestState;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument};

use crate::entity::{crew_member, crew_member_request};
use crate::error::AppError;
use crate::utils::contest::find_profile_by_user;

async fn find_request_for_update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<crew_member_request::Model, AppError> {
    let request = crew_member_request::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Crew request not found".into()))?;
    if request.state.is_decided() {
        return Err(AppError::Conflict(format!(
            "Crew request is already {}",
            request.state
        )));
    }
    Ok(request)
}

/// Get or create the (movie, profile, role) credit.
async fn credit<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    profile_id: i32,
    role_id: i32,
) -> Result<crew_member::Model, DbErr> {
    let model = crew_member::ActiveModel {
        movie_id: Set(movie_id),
        profile_id: Set(profile_id),
        role_id: Set(role_id),
        ..Default::default()
    };
    let result = crew_member::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                crew_member::Column::MovieId,
                crew_member::Column::ProfileId,
                crew_member::Column::RoleId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await;
    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    crew_member::Entity::find()
        .filter(crew_member::Column::MovieId.eq(movie_id))
        .filter(crew_member::Column::ProfileId.eq(profile_id))
        .filter(crew_member::Column::RoleId.eq(role_id))
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::Custom("crew member missing after insert".into()))
}

/// Approve a pending request and credit the requester on the film.
#[instrument(skip(db))]
pub async fn approve_crew_request(
    db: &DatabaseConnection,
    request_id: i32,
    now: DateTime<Utc>,
) -> Result<(crew_member_request::Model, crew_member::Model), AppError> {
    let txn = db.begin().await?;
    let request = find_request_for_update(&txn, request_id).await?;

    let profile = find_profile_by_user(&txn, request.user_id)
        .await?
        .ok_or_else(|| AppError::Validation("Requesting user has no profile".into()))?;
    let member = credit(&txn, request.movie_id, profile.id, request.role_id).await?;

    let mut active = request.into_active_model();
    active.state = Set(CrewRequestState::Approved);
    active.decided_at = Set(Some(now));
    let request = active.update(&txn).await?;
    txn.commit().await?;

    info!(
        movie_id = request.movie_id,
        profile_id = profile.id,
        role_id = request.role_id,
        "Crew request approved"
    );
    Ok((request, member))
}

/// Decline a pending request.
#[instrument(skip(db))]
pub async fn decline_crew_request(
    db: &DatabaseConnection,
    request_id: i32,
    now: DateTime<Utc>,
) -> Result<crew_member_request::Model, AppError> {
    let txn = db.begin().await?;
    let request = find_request_for_update(&txn, request_id).await?;

    let mut active = request.into_active_model();
    active.state = Set(CrewRequestState::Declined);
    active.decided_at = Set(Some(now));
    let request = active.update(&txn).await?;
    txn.commit().await?;

    Ok(request)
}
