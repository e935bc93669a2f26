use common::MovieState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub state: MovieState,

    /// NULL for films that are not entered in any contest.
    #[sea_orm(indexed)]
    pub contest_id: Option<i32>,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,

    /// When the film was published; starts its recommend window.
    pub publish_on: Option<DateTimeUtc>,
    pub jury_rating: Option<f64>,
    pub audience_rating: Option<f64>,

    /// Denormalized count of recommend actions. Never negative.
    #[sea_orm(default_value = 0)]
    pub recommend_count: i32,

    #[sea_orm(has_many)]
    pub crew: HasMany<super::crew_member::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
