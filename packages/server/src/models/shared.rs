use serde::{Deserialize, Serialize};

use crate::entity::profile;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Plain `?page=&per_page=` query.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
}

/// Clamp raw paging parameters to `(page >= 1, 1 <= per_page <= 100)`.
pub fn page_bounds(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    (
        Ord::max(page.unwrap_or(1), 1),
        per_page.unwrap_or(20).clamp(1, 100),
    )
}

/// Row offset of the first item on `page`, saturating instead of overflowing
/// and capped to what Postgres accepts as a `BIGINT` offset.
pub fn page_offset(page: u64, per_page: u64) -> u64 {
    page.saturating_sub(1)
        .saturating_mul(per_page)
        .min(i64::MAX as u64)
}

/// Public part of a profile shown next to leaderboard rows and lists.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileSummary {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "Dana Reyes")]
    pub name: String,
    pub image: Option<String>,
    pub is_celeb: bool,
}

impl ProfileSummary {
    /// Summary for `profile_id`, blank when the profile row is gone.
    pub fn from_optional(profile_id: i32, model: Option<profile::Model>) -> Self {
        match model {
            Some(model) => model.into(),
            None => Self {
                id: profile_id,
                name: String::new(),
                image: None,
                is_celeb: false,
            },
        }
    }
}

impl From<profile::Model> for ProfileSummary {
    fn from(p: profile::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            image: p.image,
            is_celeb: p.is_celeb,
        }
    }
}
