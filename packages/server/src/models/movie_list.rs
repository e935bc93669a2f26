use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, ProfileSummary};
use crate::entity::movie_list;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovieListQuery {
    /// Only lists owned by this user.
    pub owner_id: Option<i32>,
    /// Only curation lists of this contest.
    pub contest_id: Option<i32>,
    /// Also return global "Recommendation" lists. Default: false.
    pub include_global: Option<bool>,
    /// One of `created_at`, `likes`, `movies`. Default: `created_at`.
    pub sort_by: Option<String>,
    /// `asc` or `desc`. Default: `desc`.
    pub sort_order: Option<String>,
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ListOwner {
    #[schema(example = 5)]
    pub user_id: i32,
    #[schema(example = "dana")]
    pub username: String,
    pub profile: Option<ProfileSummary>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MovieListResponse {
    #[schema(example = 9)]
    pub id: i32,
    #[schema(example = "Monsoon Shorts 2024")]
    pub name: String,
    pub frozen: bool,
    pub contest_id: Option<i32>,
    pub owner: ListOwner,
    /// Member movie IDs, earliest addition first.
    pub movies: Vec<i32>,
    #[schema(example = 3)]
    pub movies_count: u64,
    #[schema(example = 2)]
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MovieListSummary {
    pub id: i32,
    pub name: String,
    pub frozen: bool,
    pub contest_id: Option<i32>,
    pub owner_id: i32,
    pub movies_count: u64,
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
}

impl MovieListSummary {
    pub fn new(model: movie_list::Model, movies_count: u64, like_count: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            frozen: model.frozen,
            contest_id: model.contest_id,
            owner_id: model.owner_id,
            movies_count,
            like_count,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MovieListListResponse {
    pub data: Vec<MovieListSummary>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LikeResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 2)]
    pub like_count: u64,
}
