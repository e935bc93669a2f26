use chrono::{DateTime, Utc};
use common::ContestState;
use serde::{Deserialize, Serialize};

use super::movie::MovieResponse;
use super::shared::Pagination;
use crate::entity::contest;
use crate::recommend::CurationSummary;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContestListQuery {
    /// `true`: only contests live right now. `false`: only contests that are
    /// not inside their window. Omitted: all contests.
    pub live: Option<bool>,
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
}

/// Body of the contest recommend endpoint.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RecommendRequest {
    /// Movie ID.
    #[schema(example = 42)]
    pub movie: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Monsoon Shorts 2024")]
    pub name: String,
    #[schema(example = "short-film")]
    pub kind: String,
    pub state: ContestState,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Days after release during which a film can be curated.
    #[schema(example = 7)]
    pub days_per_movie: i32,
    /// Curation list cap per user.
    #[schema(example = 20)]
    pub max_recommends: i32,
    /// Evaluated at request time.
    pub is_live: bool,
    pub created_at: DateTime<Utc>,
}

impl ContestResponse {
    pub fn new(model: contest::Model, now: DateTime<Utc>) -> Self {
        let is_live = model.is_live(now);
        Self {
            id: model.id,
            name: model.name,
            kind: model.kind,
            state: model.state,
            start_time: model.start_time,
            end_time: model.end_time,
            days_per_movie: model.days_per_movie,
            max_recommends: model.max_recommends,
            is_live,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestListResponse {
    pub data: Vec<ContestResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestMoviesResponse {
    pub data: Vec<MovieResponse>,
    pub pagination: Pagination,
}

/// The caller's curation list size in a contest.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestRecommendResponse {
    /// Contest ID.
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Monsoon Shorts 2024")]
    pub name: String,
    #[schema(example = 20)]
    pub max_recommends: i32,
    /// Films currently in the caller's curation list.
    #[schema(example = 3)]
    pub recommended: u64,
}

impl From<CurationSummary> for ContestRecommendResponse {
    fn from(s: CurationSummary) -> Self {
        Self {
            id: s.contest.id,
            name: s.contest.name,
            max_recommends: s.contest.max_recommends,
            recommended: s.recommended,
        }
    }
}
