use serde::Serialize;

use super::{ViewScope, ViewState, PENDING_MESSAGE, PENDING_TITLE};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::filter::{filter_options, total_pages, ExpertFilter, FilterError, FilterOptions, Page};
use crate::models::DirectoryExpert;

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load experts. Please try again later.";

/// What the directory renders right now
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryScreen {
    PendingVerification { title: &'static str, message: &'static str },
    Loading,
    Error { message: String },
    Listing { page: Page<DirectoryExpert>, options: FilterOptions, filter: ExpertFilter },
}

/// The `/experts` view: fetch the directory once, then filter, sort and
/// paginate locally. Pending accounts never fetch.
#[derive(Debug)]
pub struct ExpertDirectory {
    scope: ViewScope,
    pending: bool,
    state: ViewState<Vec<DirectoryExpert>>,
    filter: ExpertFilter,
    page: usize,
}

impl ExpertDirectory {
    pub async fn open(client: &ApiClient) -> Self {
        let pending = client.session().user().await.map(|u| u.is_pending()).unwrap_or(false);
        let mut view = Self {
            scope: ViewScope::new(),
            pending,
            state: ViewState::Loading,
            filter: ExpertFilter::default(),
            page: 1,
        };
        if !pending {
            view.reload(client).await;
        }
        view
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn is_pending_verification(&self) -> bool {
        self.pending
    }

    pub async fn reload(&mut self, client: &ApiClient) {
        if self.pending {
            return;
        }
        self.state = ViewState::Loading;
        match self.scope.run(client.expert_directory()).await {
            Ok(experts) => {
                tracing::debug!("loaded {} directory entries", experts.len());
                self.state = ViewState::Ready(experts);
                self.page = 1;
            }
            // Late result for a closed view: leave state alone
            Err(ApiError::Cancelled) => {}
            Err(e) => {
                tracing::error!("failed to load expert directory: {}", e);
                self.state = ViewState::Error(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub fn filter(&self) -> &ExpertFilter {
        &self.filter
    }

    pub fn set_keyword(&mut self, keyword: Option<String>) {
        self.filter.keyword = keyword;
        self.page = 1;
    }

    pub fn set_area(&mut self, area: Option<String>) {
        self.filter.area = area;
        self.page = 1;
    }

    pub fn set_local_group(&mut self, group: Option<String>) {
        self.filter.local_group = group;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filter = ExpertFilter::default();
        self.page = 1;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Move to a 1-based page. An empty result set only has page 1.
    pub fn go_to_page(&mut self, page: usize) -> Result<(), FilterError> {
        let last = total_pages(self.visible().len()).max(1);
        if page == 0 || page > last {
            return Err(FilterError::InvalidPage(page));
        }
        self.page = page;
        Ok(())
    }

    /// Every expert passing the current filters, sorted
    pub fn visible(&self) -> Vec<DirectoryExpert> {
        match &self.state {
            ViewState::Ready(experts) => self.filter.apply(experts),
            _ => Vec::new(),
        }
    }

    pub fn options(&self) -> FilterOptions {
        self.state.ready().map(|experts| filter_options(experts)).unwrap_or_default()
    }

    pub fn screen(&self) -> DirectoryScreen {
        if self.pending {
            return DirectoryScreen::PendingVerification { title: PENDING_TITLE, message: PENDING_MESSAGE };
        }
        match &self.state {
            ViewState::Loading => DirectoryScreen::Loading,
            ViewState::Error(message) => DirectoryScreen::Error { message: message.clone() },
            ViewState::Ready(_) => DirectoryScreen::Listing {
                page: Page::of(&self.visible(), self.page),
                options: self.options(),
                filter: self.filter.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user_json, TestBackend};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn directory_json(count: usize) -> serde_json::Value {
        let experts: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "user_id": i + 1,
                    "first_name": "Expert",
                    "last_name": format!("{:02}", count - i),
                    "local_group_name": if i % 2 == 0 { "Boston" } else { "Denver" },
                    "expertise": [{"area_of_expertise": if i % 3 == 0 { "Law" } else { "Finance" }, "what_offering": "Advice"}]
                })
            })
            .collect();
        json!(experts)
    }

    #[tokio::test]
    async fn pending_members_see_the_notice_and_nothing_is_fetched() {
        let backend = TestBackend::logged_in_as(user_json(1, "pending", "member", false)).await;
        Mock::given(method("GET"))
            .and(path("/api/users/experts/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(directory_json(3)))
            .expect(0)
            .mount(&backend.server)
            .await;

        let view = ExpertDirectory::open(&backend.client).await;
        assert!(view.is_pending_verification());
        assert!(matches!(
            view.screen(),
            DirectoryScreen::PendingVerification { title: PENDING_TITLE, .. }
        ));
    }

    #[tokio::test]
    async fn lists_are_paged_and_filters_reset_the_page() {
        let backend = TestBackend::logged_in_as(user_json(1, "active", "member", false)).await;
        Mock::given(method("GET"))
            .and(path("/api/users/experts/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(directory_json(30)))
            .expect(1)
            .mount(&backend.server)
            .await;

        let mut view = ExpertDirectory::open(&backend.client).await;
        let DirectoryScreen::Listing { page, .. } = view.screen() else { panic!("expected listing") };
        assert_eq!((page.total_items, page.total_pages, page.items.len()), (30, 3, 12));
        assert_eq!(page.items[0].last_name, "01");

        view.go_to_page(3).unwrap();
        let DirectoryScreen::Listing { page, .. } = view.screen() else { panic!("expected listing") };
        assert_eq!(page.items.len(), 6);
        assert_eq!(view.go_to_page(4), Err(FilterError::InvalidPage(4)));

        view.set_local_group(Some("Boston".into()));
        assert_eq!(view.page(), 1);
        assert_eq!(view.visible().len(), 15);
        assert_eq!(view.options().local_groups, vec!["Boston", "Denver"]);
    }

    #[tokio::test]
    async fn load_failures_become_an_error_banner() {
        let backend = TestBackend::logged_in_as(user_json(1, "active", "member", false)).await;
        Mock::given(method("GET"))
            .and(path("/api/users/experts/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&backend.server)
            .await;

        let view = ExpertDirectory::open(&backend.client).await;
        assert_eq!(view.screen(), DirectoryScreen::Error { message: LOAD_ERROR_MESSAGE.to_string() });
    }
}
