use std::collections::BTreeSet;

use serde::Serialize;

use super::filter_order::{locale_cmp, sort_experts, sort_users};
use super::filter_where::{matches_area, matches_expert_mode, matches_group, matches_keyword, matches_status};
use super::types::{ExpertFilterMode, SortDirection, UserSort, UserSortColumn};
use crate::models::{DirectoryExpert, User};
use crate::types::UserStatus;

/// Directory filters. All active filters are ANDed; the result is always
/// sorted by last name then first name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpertFilter {
    pub keyword: Option<String>,
    pub area: Option<String>,
    pub local_group: Option<String>,
}

impl ExpertFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn local_group(mut self, group: impl Into<String>) -> Self {
        self.local_group = Some(group.into());
        self
    }

    pub fn is_active(&self) -> bool {
        [&self.keyword, &self.area, &self.local_group]
            .iter()
            .any(|f| f.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false))
    }

    pub fn matches(&self, expert: &DirectoryExpert) -> bool {
        matches_keyword(expert, self.keyword.as_deref())
            && matches_area(expert, self.area.as_deref())
            && matches_group(expert, self.local_group.as_deref())
    }

    pub fn apply(&self, experts: &[DirectoryExpert]) -> Vec<DirectoryExpert> {
        let mut out: Vec<DirectoryExpert> = experts.iter().filter(|e| self.matches(e)).cloned().collect();
        sort_experts(&mut out);
        out
    }
}

/// Selector values observed in the loaded directory
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub areas: Vec<String>,
    pub local_groups: Vec<String>,
}

/// De-duplicated, alphabetically sorted non-empty values
pub fn filter_options(experts: &[DirectoryExpert]) -> FilterOptions {
    let areas: BTreeSet<&str> = experts
        .iter()
        .flat_map(|e| e.expertise.iter())
        .filter_map(|x| x.area_of_expertise.as_deref())
        .filter(|a| !a.trim().is_empty())
        .collect();
    let groups: BTreeSet<&str> = experts
        .iter()
        .filter_map(|e| e.local_group_name.as_deref())
        .filter(|g| !g.trim().is_empty())
        .collect();

    let mut areas: Vec<String> = areas.into_iter().map(str::to_string).collect();
    let mut local_groups: Vec<String> = groups.into_iter().map(str::to_string).collect();
    areas.sort_by(|a, b| locale_cmp(a, b));
    local_groups.sort_by(|a, b| locale_cmp(a, b));

    FilterOptions { areas, local_groups }
}

/// Admin users table state: status and expert filters plus a
/// click-to-toggle column sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub status: Option<UserStatus>,
    pub experts: ExpertFilterMode,
    pub sort: Option<UserSort>,
}

impl UserFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clicking a column sorts ascending; clicking it again flips direction
    pub fn toggle_sort(&mut self, column: UserSortColumn) {
        self.sort = Some(match self.sort {
            Some(current) if current.column == column => UserSort { column, direction: current.direction.toggle() },
            _ => UserSort { column, direction: SortDirection::Asc },
        });
    }

    pub fn apply(&self, users: &[User]) -> Vec<User> {
        let mut out: Vec<User> = users
            .iter()
            .filter(|u| matches_status(u, self.status) && matches_expert_mode(u, self.experts))
            .cloned()
            .collect();
        if let Some(sort) = self.sort {
            sort_users(&mut out, sort);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Expertise;
    use serde_json::json;

    fn expert(id: i64, first: &str, last: &str, group: &str, areas: &[(&str, &str)]) -> DirectoryExpert {
        DirectoryExpert {
            user_id: id,
            first_name: first.into(),
            last_name: last.into(),
            local_group_name: Some(group.into()).filter(|g: &String| !g.is_empty()),
            expertise: areas
                .iter()
                .map(|(area, offering)| Expertise {
                    area_of_expertise: Some(area.to_string()),
                    what_offering: offering.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn directory() -> Vec<DirectoryExpert> {
        vec![
            expert(1, "Zoe", "Adams", "Boston", &[("Law", "Contract review")]),
            expert(2, "Amy", "Baker", "Denver", &[("Finance", "Retirement planning"), ("Law", "Estates")]),
            expert(3, "Carl", "Adams", "Boston", &[("Medicine", "Second opinions")]),
            expert(4, "Dee", "Young", "", &[("Software", "Rust mentoring")]),
        ]
    }

    fn ids(experts: &[DirectoryExpert]) -> Vec<i64> {
        experts.iter().map(|e| e.user_id).collect()
    }

    #[test]
    fn unfiltered_list_is_sorted_by_last_then_first() {
        let result = ExpertFilter::new().apply(&directory());
        assert_eq!(ids(&result), vec![3, 1, 2, 4]);
    }

    #[test]
    fn keyword_is_case_insensitive_over_area_and_offering() {
        assert_eq!(ids(&ExpertFilter::new().keyword("LAW").apply(&directory())), vec![1, 2]);
        assert_eq!(ids(&ExpertFilter::new().keyword("rust").apply(&directory())), vec![4]);
        assert_eq!(ids(&ExpertFilter::new().keyword("   ").apply(&directory())), vec![3, 1, 2, 4]);
    }

    #[test]
    fn area_and_group_are_exact() {
        assert_eq!(ids(&ExpertFilter::new().area("Law").apply(&directory())), vec![1, 2]);
        assert!(ExpertFilter::new().area("law").apply(&directory()).is_empty());
        assert_eq!(ids(&ExpertFilter::new().local_group("Boston").apply(&directory())), vec![3, 1]);
    }

    #[test]
    fn filters_commute() {
        let data = directory();
        let all = ExpertFilter::new().keyword("e").area("Law").local_group("Boston");
        let staged_a = ExpertFilter::new().local_group("Boston").apply(&data);
        let staged_a = ExpertFilter::new().area("Law").apply(&staged_a);
        let staged_a = ExpertFilter::new().keyword("e").apply(&staged_a);
        let staged_b = ExpertFilter::new().keyword("e").apply(&data);
        let staged_b = ExpertFilter::new().local_group("Boston").apply(&staged_b);
        let staged_b = ExpertFilter::new().area("Law").apply(&staged_b);

        assert_eq!(all.apply(&data), staged_a);
        assert_eq!(staged_a, staged_b);
        assert_eq!(ids(&staged_a), vec![1]);
    }

    #[test]
    fn options_are_deduplicated_and_sorted() {
        let options = filter_options(&directory());
        assert_eq!(options.areas, vec!["Finance", "Law", "Medicine", "Software"]);
        assert_eq!(options.local_groups, vec!["Boston", "Denver"]);
    }

    fn user(id: i64, last: &str, email: &str, status: &str, is_expert: bool) -> User {
        serde_json::from_value(json!({
            "id": id, "first_name": "X", "last_name": last, "email": email,
            "status": status, "is_expert": is_expert
        }))
        .unwrap()
    }

    #[test]
    fn user_filter_toggles_sort_direction() {
        let users = vec![
            user(1, "Moss", "b@example.org", "active", true),
            user(2, "Abel", "c@example.org", "pending", false),
            user(3, "Zane", "a@example.org", "active", false),
        ];
        let mut filter = UserFilter::new();
        assert_eq!(filter.apply(&users).iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        filter.toggle_sort(UserSortColumn::Name);
        assert_eq!(filter.apply(&users).iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 1, 3]);
        filter.toggle_sort(UserSortColumn::Name);
        assert_eq!(filter.apply(&users).iter().map(|u| u.id).collect::<Vec<_>>(), vec![3, 1, 2]);
        filter.toggle_sort(UserSortColumn::Email);
        assert_eq!(filter.sort.map(|s| s.direction), Some(SortDirection::Asc));
        assert_eq!(filter.apply(&users).iter().map(|u| u.id).collect::<Vec<_>>(), vec![3, 1, 2]);

        filter.status = Some(UserStatus::Active);
        filter.experts = ExpertFilterMode::NonExperts;
        assert_eq!(filter.apply(&users).iter().map(|u| u.id).collect::<Vec<_>>(), vec![3]);
    }
}
