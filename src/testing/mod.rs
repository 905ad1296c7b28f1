use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::MockServer;

use crate::api::{normalize_base_url, ApiClient};
use crate::auth::{MemoryTokenStore, Navigator, RecordingNavigator, SessionStore, StoredTokens};
use crate::models::User;

/// A mock backend plus a client wired to it with in-memory token storage
pub struct TestBackend {
    pub server: MockServer,
    pub tokens: Arc<MemoryTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: ApiClient,
}

impl TestBackend {
    /// Anonymous session
    pub async fn new() -> Self {
        Self::build(MemoryTokenStore::new()).await
    }

    pub async fn with_tokens(access: &str, refresh: Option<&str>) -> Self {
        let tokens = StoredTokens::new(access.to_string(), refresh.map(str::to_string));
        Self::build(MemoryTokenStore::with_tokens(tokens)).await
    }

    /// Session holding `access-1`/`refresh-1` for the given user
    pub async fn logged_in_as(user: Value) -> Self {
        let backend = Self::with_tokens("access-1", Some("refresh-1")).await;
        let user: User = serde_json::from_value(user).expect("test user json");
        backend.client.session().set_user(Some(user)).await;
        backend
    }

    async fn build(store: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let base_url = normalize_base_url(&format!("{}/api", server.uri())).expect("mock server url");
        let tokens = Arc::new(store);
        let session = SessionStore::restore_with_client(reqwest::Client::new(), base_url, tokens.clone())
            .await
            .expect("restore session");
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ApiClient::with_http(
            reqwest::Client::new(),
            Arc::new(session),
            navigator.clone() as Arc<dyn Navigator>,
        );
        Self { server, tokens, navigator, client }
    }
}

pub fn user_json(id: i64, status: &str, role: &str, is_expert: bool) -> Value {
    json!({
        "id": id,
        "username": format!("member{}", id),
        "email": format!("member{}@example.org", id),
        "first_name": "Test",
        "last_name": format!("Member{}", id),
        "role": role,
        "status": status,
        "is_expert": is_expert,
        "local_group": 1,
        "local_group_name": "Boston Area",
        "phone": "+16178670123",
        "member_id": "100200",
        "city": "Boston",
        "state": "MA"
    })
}
