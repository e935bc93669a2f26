use chrono::{DateTime, Utc};
use common::CrewRequestState;
use serde::Serialize;

use crate::entity::{crew_member, crew_member_request};
use crate::leaderboard::JobReport;

#[derive(Serialize, utoipa::ToSchema)]
pub struct RefreshResponse {
    #[schema(example = "top-creators")]
    pub board: String,
    pub report: JobReport,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CrewRequestResponse {
    #[schema(example = 3)]
    pub id: i32,
    pub movie_id: i32,
    pub user_id: i32,
    pub role_id: i32,
    pub state: CrewRequestState,
    pub decided_at: Option<DateTime<Utc>>,
    /// Crew credit created by an approval.
    pub crew_member_id: Option<i32>,
}

impl CrewRequestResponse {
    pub fn new(
        request: crew_member_request::Model,
        member: Option<crew_member::Model>,
    ) -> Self {
        Self {
            id: request.id,
            movie_id: request.movie_id,
            user_id: request.user_id,
            role_id: request.role_id,
            state: request.state,
            decided_at: request.decided_at,
            crew_member_id: member.map(|m| m.id),
        }
    }
}
