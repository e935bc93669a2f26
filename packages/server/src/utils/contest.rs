use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entity::{contest, movie, movie_list, profile};
use crate::error::AppError;

/// Look up a contest by ID, returning 404 if not found.
pub async fn find_contest<C: ConnectionTrait>(db: &C, id: i32) -> Result<contest::Model, AppError> {
    contest::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

/// Look up a movie by ID, returning 404 if not found.
pub async fn find_movie<C: ConnectionTrait>(db: &C, id: i32) -> Result<movie::Model, AppError> {
    movie::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".into()))
}

/// Look up a movie list by ID, returning 404 if not found.
pub async fn find_movie_list<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<movie_list::Model, AppError> {
    movie_list::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie list not found".into()))
}

/// The caller's profile, if the identity service created one.
pub async fn find_profile_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<profile::Model>, AppError> {
    Ok(profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}
