use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's recommendation list.
///
/// Either the global "Recommendation" list (`contest_id` NULL) or a contest
/// curation list named after its contest. Unique on (owner_id, name) and on
/// (owner_id, contest_id); see `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie_list")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub owner_id: i32,
    #[sea_orm(belongs_to, from = "owner_id", to = "id")]
    pub owner: HasOne<super::user::Entity>,

    pub name: String,

    #[sea_orm(default_value = false)]
    pub frozen: bool,

    #[sea_orm(indexed)]
    pub contest_id: Option<i32>,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,

    #[sea_orm(has_many)]
    pub entries: HasMany<super::movie_list_movie::Entity>,

    #[sea_orm(has_many)]
    pub likes: HasMany<super::movie_list_like::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
