#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use wiremock::MockServer;

use member_directory::api::{normalize_base_url, ApiClient};
use member_directory::auth::{MemoryTokenStore, Navigator, RecordingNavigator, SessionStore, StoredTokens, TokenStore};

/// Mock backend mounted at `/api/` plus a client pointed at it
pub struct Backend {
    pub server: MockServer,
    pub navigator: Arc<RecordingNavigator>,
    pub client: ApiClient,
}

impl Backend {
    pub async fn anonymous() -> Result<Self> {
        Self::with_store(Arc::new(MemoryTokenStore::new())).await
    }

    pub async fn with_tokens(access: &str, refresh: Option<&str>) -> Result<(Self, Arc<MemoryTokenStore>)> {
        let store = Arc::new(MemoryTokenStore::with_tokens(StoredTokens::new(
            access.to_string(),
            refresh.map(str::to_string),
        )));
        let backend = Self::with_store(store.clone()).await?;
        Ok((backend, store))
    }

    pub async fn with_store(store: Arc<dyn TokenStore>) -> Result<Self> {
        let server = MockServer::start().await;
        let (client, navigator) = client_for(&server, store).await?;
        Ok(Self { server, navigator, client })
    }

    pub fn url(&self) -> String {
        format!("{}/api/", self.server.uri())
    }
}

/// A fresh client over an existing server and store, as after a restart
pub async fn client_for(server: &MockServer, store: Arc<dyn TokenStore>) -> Result<(ApiClient, Arc<RecordingNavigator>)> {
    let base_url = normalize_base_url(&format!("{}/api", server.uri()))?;
    let session = SessionStore::restore_with_client(reqwest::Client::new(), base_url, store).await?;
    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::with_http(reqwest::Client::new(), Arc::new(session), navigator.clone() as Arc<dyn Navigator>);
    Ok((client, navigator))
}

pub fn user(id: i64, status: &str, role: &str, is_expert: bool) -> Value {
    json!({
        "id": id,
        "username": format!("member{}@example.org", id),
        "email": format!("member{}@example.org", id),
        "first_name": "Pat",
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
