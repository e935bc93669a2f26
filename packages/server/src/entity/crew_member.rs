use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A profile credited on a film in some role. (movie, profile, role) is unique.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "crew_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub movie_id: i32,
    #[sea_orm(belongs_to, from = "movie_id", to = "id")]
    pub movie: HasOne<super::movie::Entity>,

    pub profile_id: i32,
    #[sea_orm(belongs_to, from = "profile_id", to = "id")]
    pub profile: HasOne<super::profile::Entity>,

    pub role_id: i32,
    #[sea_orm(belongs_to, from = "role_id", to = "id")]
    pub role: HasOne<super::crew_role::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
