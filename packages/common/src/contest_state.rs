#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseStateError;

/// Lifecycle state of a contest.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum ContestState {
    /// Announced but not yet accepting recommendations.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Created"))]
    Created,
    /// Open, subject to the start/end window.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Live"))]
    Live,
    /// Closed for good.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Finished"))]
    Finished,
}

impl ContestState {
    pub const ALL: &'static [ContestState] = &[Self::Created, Self::Live, Self::Finished];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Live => "Live",
            Self::Finished => "Finished",
        }
    }
}

impl fmt::Display for ContestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ContestState {
    fn default() -> Self {
        Self::Created
    }
}

impl FromStr for ContestState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseStateError::new(s, Self::ALL.iter().map(|s| s.as_str())))
    }
}
