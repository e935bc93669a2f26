use common::ContestState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Curation lists of this contest are named after it, so it must be unique.
    #[sea_orm(unique)]
    pub name: String,
    pub kind: String,
    #[sea_orm(indexed)]
    pub state: ContestState,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,

    /// Days after a film's `publish_on` during which it may be curated.
    pub days_per_movie: i32,
    /// Cap on the size of each curation list in this contest.
    pub max_recommends: i32,

    #[sea_orm(has_many)]
    pub movies: HasMany<super::movie::Entity>,

    #[sea_orm(has_many)]
    pub movie_lists: HasMany<super::movie_list::Entity>,

    #[sea_orm(has_many)]
    pub top_creators: HasMany<super::top_creator::Entity>,

    #[sea_orm(has_many)]
    pub top_curators: HasMany<super::top_curator::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
