// Row predicates for the directory and admin tables.
// Inactive filters (None / blank) match everything.

use crate::models::{DirectoryExpert, User};
use crate::types::UserStatus;

use super::types::ExpertFilterMode;

/// Case-insensitive match against any expertise's area name or offering
pub fn matches_keyword(expert: &DirectoryExpert, keyword: Option<&str>) -> bool {
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
        return true;
    };
    let needle = keyword.to_lowercase();

    expert.expertise.iter().any(|e| {
        e.area_of_expertise
            .as_deref()
            .map(|area| area.to_lowercase().contains(&needle))
            .unwrap_or(false)
            || e.what_offering.to_lowercase().contains(&needle)
    })
}

/// Exact match against any expertise's area name
pub fn matches_area(expert: &DirectoryExpert, area: Option<&str>) -> bool {
    match area.filter(|a| !a.is_empty()) {
        None => true,
        Some(area) => expert
            .expertise
            .iter()
            .any(|e| e.area_of_expertise.as_deref() == Some(area)),
    }
}

/// Exact match against the expert's local group name
pub fn matches_group(expert: &DirectoryExpert, group: Option<&str>) -> bool {
    match group.filter(|g| !g.is_empty()) {
        None => true,
        Some(group) => expert.local_group_name.as_deref() == Some(group),
    }
}

pub fn matches_status(user: &User, status: Option<UserStatus>) -> bool {
    status.map(|s| user.status == s).unwrap_or(true)
}

pub fn matches_expert_mode(user: &User, mode: ExpertFilterMode) -> bool {
    match mode {
        ExpertFilterMode::All => true,
        ExpertFilterMode::Experts => user.is_expert,
        ExpertFilterMode::NonExperts => !user.is_expert,
    }
}
