use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Crew roles seeded on startup.
pub const DEFAULT_CREW_ROLES: &[&str] = &[
    common::DIRECTOR_ROLE,
    "Producer",
    "Writer",
    "Cinematographer",
    "Editor",
    "Actor",
];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "crew_role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(has_many)]
    pub members: HasMany<super::crew_member::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
