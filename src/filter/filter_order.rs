use std::cmp::Ordering;

use crate::models::{DirectoryExpert, User};

use super::types::{SortDirection, UserSort, UserSortColumn};

/// Case-folded comparison with a raw tiebreak, approximating a
/// locale-aware collation for names.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Last name, then first name
pub fn compare_experts(a: &DirectoryExpert, b: &DirectoryExpert) -> Ordering {
    locale_cmp(&a.last_name, &b.last_name).then_with(|| locale_cmp(&a.first_name, &b.first_name))
}

pub fn sort_experts(experts: &mut [DirectoryExpert]) {
    experts.sort_by(compare_experts);
}

fn compare_users_by(column: UserSortColumn, a: &User, b: &User) -> Ordering {
    match column {
        UserSortColumn::Name => {
            locale_cmp(&a.last_name, &b.last_name).then_with(|| locale_cmp(&a.first_name, &b.first_name))
        }
        UserSortColumn::Email => locale_cmp(&a.email, &b.email),
        UserSortColumn::LocalGroup => locale_cmp(
            a.local_group_name.as_deref().unwrap_or(""),
            b.local_group_name.as_deref().unwrap_or(""),
        ),
        UserSortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

pub fn sort_users(users: &mut [User], sort: UserSort) {
    users.sort_by(|a, b| {
        let ordering = compare_users_by(sort.column, a, b);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
