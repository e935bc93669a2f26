use chrono::{DateTime, Utc};
use common::RECOMMENDATION_LIST_NAME;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Set,
};

use crate::entity::{contest, movie_list, movie_list_like, movie_list_movie, user};
use crate::error::AppError;

/// Storage operations on recommendation lists.
///
/// Meant to run inside a transaction: the `*_for_update` lookups take a row
/// lock that serializes concurrent writers to the same list.
pub struct ListStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ListStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Make sure the token's subject has a `user` row to own lists and likes.
    pub async fn ensure_owner(
        &self,
        user_id: i32,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let model = user::ActiveModel {
            id: Set(user_id),
            username: Set(username.to_owned()),
            created_at: Set(now),
        };
        let result = user::Entity::insert(model)
            .on_conflict(OnConflict::column(user::Column::Id).do_nothing().to_owned())
            .exec_without_returning(self.conn)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn find_global_list(
        &self,
        owner_id: i32,
    ) -> Result<Option<movie_list::Model>, DbErr> {
        movie_list::Entity::find()
            .filter(movie_list::Column::OwnerId.eq(owner_id))
            .filter(movie_list::Column::Name.eq(RECOMMENDATION_LIST_NAME))
            .filter(movie_list::Column::ContestId.is_null())
            .one(self.conn)
            .await
    }

    pub async fn find_curation_list(
        &self,
        owner_id: i32,
        contest_id: i32,
    ) -> Result<Option<movie_list::Model>, DbErr> {
        movie_list::Entity::find()
            .filter(movie_list::Column::OwnerId.eq(owner_id))
            .filter(movie_list::Column::ContestId.eq(contest_id))
            .one(self.conn)
            .await
    }

    /// Get or create the owner's global "Recommendation" list and lock it.
    pub async fn global_list_for_update(
        &self,
        owner_id: i32,
        now: DateTime<Utc>,
    ) -> Result<movie_list::Model, AppError> {
        self.create_if_missing(owner_id, RECOMMENDATION_LIST_NAME, None, false, now)
            .await?;

        movie_list::Entity::find()
            .filter(movie_list::Column::OwnerId.eq(owner_id))
            .filter(movie_list::Column::Name.eq(RECOMMENDATION_LIST_NAME))
            .lock(LockType::Update)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::Internal("Recommendation list vanished after insert".into()))
    }

    /// Get or create the owner's curation list for `contest` and lock it.
    pub async fn curation_list_for_update(
        &self,
        owner_id: i32,
        contest: &contest::Model,
        now: DateTime<Utc>,
    ) -> Result<movie_list::Model, AppError> {
        let existing = movie_list::Entity::find()
            .filter(movie_list::Column::OwnerId.eq(owner_id))
            .filter(movie_list::Column::ContestId.eq(contest.id))
            .lock(LockType::Update)
            .one(self.conn)
            .await?;
        if let Some(list) = existing {
            return Ok(list);
        }

        self.create_if_missing(owner_id, &contest.name, Some(contest.id), true, now)
            .await?;

        movie_list::Entity::find()
            .filter(movie_list::Column::OwnerId.eq(owner_id))
            .filter(movie_list::Column::ContestId.eq(contest.id))
            .lock(LockType::Update)
            .one(self.conn)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "You already have a list named \"{}\"",
                    contest.name
                ))
            })
    }

    /// Insert a list unless one with the same (owner, name) exists.
    async fn create_if_missing(
        &self,
        owner_id: i32,
        name: &str,
        contest_id: Option<i32>,
        frozen: bool,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let model = movie_list::ActiveModel {
            owner_id: Set(owner_id),
            name: Set(name.to_owned()),
            frozen: Set(frozen),
            contest_id: Set(contest_id),
            created_at: Set(now),
            ..Default::default()
        };
        let result = movie_list::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([movie_list::Column::OwnerId, movie_list::Column::Name])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Number of movies in a list.
    pub async fn size(&self, list_id: i32) -> Result<u64, DbErr> {
        movie_list_movie::Entity::find()
            .filter(movie_list_movie::Column::ListId.eq(list_id))
            .count(self.conn)
            .await
    }

    pub async fn contains(&self, list_id: i32, movie_id: i32) -> Result<bool, DbErr> {
        Ok(movie_list_movie::Entity::find_by_id((list_id, movie_id))
            .one(self.conn)
            .await?
            .is_some())
    }

    /// Add a movie. Returns `true` when it was not already a member.
    pub async fn insert_movie(
        &self,
        list_id: i32,
        movie_id: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let model = movie_list_movie::ActiveModel {
            list_id: Set(list_id),
            movie_id: Set(movie_id),
            added_at: Set(now),
        };
        let result = movie_list_movie::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    movie_list_movie::Column::ListId,
                    movie_list_movie::Column::MovieId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;

        match result {
            Ok(rows) => Ok(rows > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove a movie. Returns `true` when it was a member.
    pub async fn remove_movie(&self, list_id: i32, movie_id: i32) -> Result<bool, DbErr> {
        let res = movie_list_movie::Entity::delete_many()
            .filter(movie_list_movie::Column::ListId.eq(list_id))
            .filter(movie_list_movie::Column::MovieId.eq(movie_id))
            .exec(self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Record a like. Returns `true` when the user had not liked the list yet.
    pub async fn insert_like(
        &self,
        list_id: i32,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let model = movie_list_like::ActiveModel {
            list_id: Set(list_id),
            user_id: Set(user_id),
            liked_at: Set(now),
        };
        let result = movie_list_like::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    movie_list_like::Column::ListId,
                    movie_list_like::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;

        match result {
            Ok(rows) => Ok(rows > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn remove_like(&self, list_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let res = movie_list_like::Entity::delete_many()
            .filter(movie_list_like::Column::ListId.eq(list_id))
            .filter(movie_list_like::Column::UserId.eq(user_id))
            .exec(self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn like_count(&self, list_id: i32) -> Result<u64, DbErr> {
        movie_list_like::Entity::find()
            .filter(movie_list_like::Column::ListId.eq(list_id))
            .count(self.conn)
            .await
    }
}
