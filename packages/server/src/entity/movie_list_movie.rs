use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie_list_movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub list_id: i32,
    #[sea_orm(primary_key)]
    pub movie_id: i32,
    #[sea_orm(belongs_to, from = "list_id", to = "id")]
    pub list: HasOne<super::movie_list::Entity>,
    #[sea_orm(belongs_to, from = "movie_id", to = "id")]
    pub movie: HasOne<super::movie::Entity>,

    pub added_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
