use chrono::{DateTime, Utc};
use serde::Serialize;

use super::shared::{Pagination, ProfileSummary};
use crate::entity::{profile, top_creator, top_curator};

#[derive(Serialize, utoipa::ToSchema)]
pub struct TopCreatorResponse {
    #[schema(example = 1)]
    pub pos: i32,
    #[schema(example = 39.0)]
    pub score: f64,
    #[schema(example = 0)]
    pub recommend_count: i32,
    pub profile: ProfileSummary,
    /// When the snapshot was computed.
    pub created_at: DateTime<Utc>,
}

impl TopCreatorResponse {
    pub fn new(row: top_creator::Model, profile: Option<profile::Model>) -> Self {
        Self {
            pos: row.pos,
            score: row.score,
            recommend_count: row.recommend_count,
            profile: ProfileSummary::from_optional(row.profile_id, profile),
            created_at: row.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TopCuratorResponse {
    #[schema(example = 1)]
    pub pos: i32,
    #[schema(example = 200.0)]
    pub score: f64,
    /// Share of the celebrity picks this curator also picked, 0-100.
    #[serde(rename = "match")]
    #[schema(example = 100.0)]
    pub match_percent: f64,
    #[schema(example = 2)]
    pub likes_on_recommend: i32,
    #[schema(example = 1)]
    pub recommend_count: i32,
    pub profile: ProfileSummary,
    pub created_at: DateTime<Utc>,
}

impl TopCuratorResponse {
    pub fn new(row: top_curator::Model, profile: Option<profile::Model>) -> Self {
        Self {
            pos: row.pos,
            score: row.score,
            match_percent: row.match_percent,
            likes_on_recommend: row.likes_on_recommend,
            recommend_count: row.recommend_count,
            profile: ProfileSummary::from_optional(row.profile_id, profile),
            created_at: row.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TopCreatorListResponse {
    pub data: Vec<TopCreatorResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TopCuratorListResponse {
    pub data: Vec<TopCuratorResponse>,
    pub pagination: Pagination,
}
