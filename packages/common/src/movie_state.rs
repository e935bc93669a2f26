#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseStateError;

/// Where a submitted film is in the review pipeline.
///
/// Only `Published` films take part in contests and leaderboards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum MovieState {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Created"))]
    Created,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Submitted"))]
    Submitted,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Rejected"))]
    Rejected,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Published"))]
    Published,
}

impl MovieState {
    pub const ALL: &'static [MovieState] = &[
        Self::Created,
        Self::Submitted,
        Self::Rejected,
        Self::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Submitted => "Submitted",
            Self::Rejected => "Rejected",
            Self::Published => "Published",
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for MovieState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for MovieState {
    fn default() -> Self {
        Self::Created
    }
}

impl FromStr for MovieState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseStateError::new(s, Self::ALL.iter().map(|s| s.as_str())))
    }
}

/// Decision state of a request to be credited as crew on a film.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum CrewRequestState {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Submitted"))]
    Submitted,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Approved"))]
    Approved,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Declined"))]
    Declined,
}

impl CrewRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Approved => "Approved",
            Self::Declined => "Declined",
        }
    }

    /// Returns true once an admin has decided the request either way.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Submitted)
    }
}

impl fmt::Display for CrewRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
