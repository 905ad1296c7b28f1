use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sortable columns of the admin users table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortColumn {
    Name,
    Email,
    LocalGroup,
    Status,
}

impl FromStr for UserSortColumn {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "name" => Ok(UserSortColumn::Name),
            "email" => Ok(UserSortColumn::Email),
            "local_group" | "group" => Ok(UserSortColumn::LocalGroup),
            "status" => Ok(UserSortColumn::Status),
            _ => Err(FilterError::UnknownSortColumn(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub column: UserSortColumn,
    pub direction: SortDirection,
}

/// Expert / non-expert selector of the admin users table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertFilterMode {
    #[default]
    All,
    Experts,
    NonExperts,
}

impl FromStr for ExpertFilterMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "all" => Ok(ExpertFilterMode::All),
            "experts" | "expert" => Ok(ExpertFilterMode::Experts),
            "non_experts" | "non_expert" => Ok(ExpertFilterMode::NonExperts),
            _ => Err(FilterError::UnknownExpertFilter(s.to_string())),
        }
    }
}
