//! `/admin`: users, admin actions, industries and local groups. Each tab
//! fetches on first activation and keeps its data for the life of the panel.

mod reference;

pub use reference::{ReferenceEntity, ReferenceTable};

use std::collections::HashMap;

use serde::Serialize;

use super::ViewScope;
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::filter::UserFilter;
use crate::models::{AdminAction, Industry, LocalGroup, User};

pub const ADMIN_REQUIRED: &str = "You do not have permission to access the admin panel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminTab {
    Users,
    Actions,
    Industries,
    LocalGroups,
}

#[derive(Debug)]
pub struct AdminPanel {
    scope: ViewScope,
    active: AdminTab,
    users: Option<Vec<User>>,
    actions: Option<Vec<AdminAction>>,
    tab_errors: HashMap<AdminTab, String>,
    pub industries: ReferenceTable<Industry>,
    pub local_groups: ReferenceTable<LocalGroup>,
    pub user_filter: UserFilter,
}

impl AdminPanel {
    /// Re-checks the role itself; the route guard only checks login. A
    /// failed Users fetch is kept as that tab's error rather than refusing
    /// to open the panel.
    pub async fn open(client: &ApiClient) -> Result<Self, ApiError> {
        let is_admin = client.session().user().await.map(|u| u.is_admin()).unwrap_or(false);
        if !is_admin {
            tracing::warn!("non-admin attempted to open the admin panel");
            return Err(ApiError::forbidden(ADMIN_REQUIRED));
        }

        let mut panel = Self {
            scope: ViewScope::new(),
            active: AdminTab::Users,
            users: None,
            actions: None,
            tab_errors: HashMap::new(),
            industries: ReferenceTable::default(),
            local_groups: ReferenceTable::default(),
            user_filter: UserFilter::default(),
        };
        if let Err(e) = panel.activate(AdminTab::Users, client).await {
            if e.is_cancelled() {
                return Err(e);
            }
            tracing::warn!("could not load users for the admin panel: {}", e);
        }
        Ok(panel)
    }

    pub fn active_tab(&self) -> AdminTab {
        self.active
    }

    pub fn is_loaded(&self, tab: AdminTab) -> bool {
        match tab {
            AdminTab::Users => self.users.is_some(),
            AdminTab::Actions => self.actions.is_some(),
            AdminTab::Industries => self.industries.is_loaded(),
            AdminTab::LocalGroups => self.local_groups.is_loaded(),
        }
    }

    /// Message from the tab's last failed fetch, cleared once it loads
    pub fn tab_error(&self, tab: AdminTab) -> Option<&str> {
        self.tab_errors.get(&tab).map(String::as_str)
    }

    /// Switch tabs, fetching the tab's data only the first time
    pub async fn activate(&mut self, tab: AdminTab, client: &ApiClient) -> Result<(), ApiError> {
        self.active = tab;
        match self.load_tab(tab, client).await {
            Ok(()) => {
                self.tab_errors.remove(&tab);
                Ok(())
            }
            Err(e) => {
                if !e.is_cancelled() {
                    self.tab_errors.insert(tab, e.message());
                }
                Err(e)
            }
        }
    }

    async fn load_tab(&mut self, tab: AdminTab, client: &ApiClient) -> Result<(), ApiError> {
        let scope = &self.scope;
        match tab {
            AdminTab::Users if self.users.is_none() => {
                self.users = Some(scope.run(client.all_users()).await?);
            }
            AdminTab::Actions if self.actions.is_none() => {
                self.actions = Some(scope.run(client.admin_actions()).await?);
            }
            AdminTab::Industries => scope.run(self.industries.ensure_loaded(client)).await?,
            AdminTab::LocalGroups => scope.run(self.local_groups.ensure_loaded(client)).await?,
            _ => {}
        }
        Ok(())
    }

    /// Users after the status/expert filters and the chosen sort
    pub fn users(&self) -> Vec<User> {
        self.users.as_deref().map(|users| self.user_filter.apply(users)).unwrap_or_default()
    }

    pub fn actions(&self) -> &[AdminAction] {
        self.actions.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndustryDraft;
    use crate::testing::{user_json, TestBackend};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    async fn mount_users(backend: &TestBackend) {
        Mock::given(method("GET"))
            .and(path("/api/users/all/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                user_json(1, "active", "admin", false),
                user_json(2, "pending", "member", true),
            ])))
            .expect(1)
            .mount(&backend.server)
            .await;
    }

    #[tokio::test]
    async fn members_are_refused() {
        let backend = TestBackend::logged_in_as(user_json(2, "active", "member", false)).await;
        let err = AdminPanel::open(&backend.client).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn failed_user_fetch_opens_with_an_error_tab() {
        let backend = TestBackend::logged_in_as(user_json(1, "active", "admin", false)).await;
        Mock::given(method("GET"))
            .and(path("/api/users/all/"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "Database unavailable"})))
            .up_to_n_times(1)
            .mount(&backend.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users/all/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json(1, "active", "admin", false)])))
            .mount(&backend.server)
            .await;

        let mut panel = AdminPanel::open(&backend.client).await.unwrap();
        assert_eq!(panel.active_tab(), AdminTab::Users);
        assert!(!panel.is_loaded(AdminTab::Users));
        assert_eq!(panel.tab_error(AdminTab::Users), Some("Database unavailable"));
        assert!(panel.users().is_empty());

        panel.activate(AdminTab::Users, &backend.client).await.unwrap();
        assert_eq!(panel.tab_error(AdminTab::Users), None);
        assert_eq!(panel.users().len(), 1);
    }

    #[tokio::test]
    async fn tabs_fetch_once_and_keep_their_data() {
        let backend = TestBackend::logged_in_as(user_json(1, "active", "admin", false)).await;
        mount_users(&backend).await;
        Mock::given(method("GET"))
            .and(path("/api/industries/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Law"}])))
            .expect(1)
            .mount(&backend.server)
            .await;

        let mut panel = AdminPanel::open(&backend.client).await.unwrap();
        assert!(panel.is_loaded(AdminTab::Users));
        assert!(!panel.is_loaded(AdminTab::Industries));

        panel.activate(AdminTab::Industries, &backend.client).await.unwrap();
        panel.activate(AdminTab::Users, &backend.client).await.unwrap();
        panel.activate(AdminTab::Industries, &backend.client).await.unwrap();
        assert_eq!(panel.active_tab(), AdminTab::Industries);
        assert_eq!(panel.industries.rows().len(), 1);
        assert_eq!(panel.users().len(), 2);
    }

    #[tokio::test]
    async fn create_clears_inputs_only_on_success() {
        let backend = TestBackend::logged_in_as(user_json(1, "active", "admin", false)).await;
        mount_users(&backend).await;
        Mock::given(method("GET"))
            .and(path("/api/industries/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&backend.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/industries/"))
            .and(body_json(json!({"name": "Duplicate", "description": ""})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"name": ["industry with this name already exists."]})))
            .mount(&backend.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/industries/"))
            .and(body_json(json!({"name": "Energy", "description": "Oil, gas and renewables"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7, "name": "Energy", "description": "Oil, gas and renewables"})))
            .mount(&backend.server)
            .await;

        let mut panel = AdminPanel::open(&backend.client).await.unwrap();
        panel.activate(AdminTab::Industries, &backend.client).await.unwrap();

        panel.industries.draft = IndustryDraft { name: "Duplicate".into(), description: String::new() };
        assert!(panel.industries.create(&backend.client).await.is_err());
        assert_eq!(panel.industries.draft.name, "Duplicate");
        assert_eq!(panel.industries.error.as_deref(), Some("industry with this name already exists."));

        panel.industries.draft =
            IndustryDraft { name: "Energy".into(), description: "Oil, gas and renewables".into() };
        let created = panel.industries.create(&backend.client).await.unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(panel.industries.draft, IndustryDraft::default());
        assert_eq!(panel.industries.rows().len(), 1);
    }

    #[tokio::test]
    async fn edits_and_deletes_go_through_buffers_and_confirmation() {
        let backend = TestBackend::logged_in_as(user_json(1, "active", "admin", false)).await;
        mount_users(&backend).await;
        Mock::given(method("GET"))
            .and(path("/api/local_groups/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 3, "name": "Boston Area", "number": "021"},
                {"id": 4, "name": "Denver", "number": "803"}
            ])))
            .mount(&backend.server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/local_groups/3/"))
            .and(body_json(json!({"name": "Greater Boston", "number": "021"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "Greater Boston", "number": "021"})))
            .expect(1)
            .mount(&backend.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/local_groups/4/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&backend.server)
            .await;

        let mut panel = AdminPanel::open(&backend.client).await.unwrap();
        panel.activate(AdminTab::LocalGroups, &backend.client).await.unwrap();

        panel.local_groups.begin_edit(3).unwrap().name = "Greater Boston".into();
        assert!(panel.local_groups.is_editing(3));
        panel.local_groups.save_edit(3, &backend.client).await.unwrap();
        assert!(!panel.local_groups.is_editing(3));
        assert_eq!(panel.local_groups.rows()[0].name, "Greater Boston");

        let declined = panel.local_groups.delete(4, &|_: &str| false, &backend.client).await.unwrap();
        assert!(!declined);
        assert_eq!(panel.local_groups.rows().len(), 2);

        let deleted = panel.local_groups.delete(4, &|_: &str| true, &backend.client).await.unwrap();
        assert!(deleted);
        assert_eq!(panel.local_groups.rows().len(), 1);
    }
}
