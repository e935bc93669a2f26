use chrono::{DateTime, Utc};
use common::MovieState;
use serde::Serialize;

use crate::entity::{contest, movie};

#[derive(Serialize, utoipa::ToSchema)]
pub struct MovieResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "The Long Monsoon")]
    pub title: String,
    pub state: MovieState,
    pub contest_id: Option<i32>,
    pub publish_on: Option<DateTime<Utc>>,
    pub jury_rating: Option<f64>,
    pub audience_rating: Option<f64>,
    #[schema(example = 17)]
    pub recommend_count: i32,
    /// Exclusive end of the contest recommend window, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommend_deadline: Option<DateTime<Utc>>,
}

impl MovieResponse {
    pub fn new(model: movie::Model, contest: Option<&contest::Model>) -> Self {
        let recommend_deadline = contest.and_then(|c| model.recommend_deadline(c));
        Self {
            id: model.id,
            title: model.title,
            state: model.state,
            contest_id: model.contest_id,
            publish_on: model.publish_on,
            jury_rating: model.jury_rating,
            audience_rating: model.audience_rating,
            recommend_count: model.recommend_count,
            recommend_deadline,
        }
    }
}
