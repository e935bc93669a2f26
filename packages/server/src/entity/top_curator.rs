use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of a contest's Top Curators snapshot.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "top_curator")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub profile_id: i32,
    #[sea_orm(belongs_to, from = "profile_id", to = "id")]
    pub profile: HasOne<super::profile::Entity>,

    pub contest_id: i32,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,

    pub pos: i32,
    pub score: f64,
    /// Percentage (0-100) of the celebrity pool this curator also picked.
    pub match_percent: f64,
    pub likes_on_recommend: i32,
    pub recommend_count: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
