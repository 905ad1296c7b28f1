use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use super::token_store::{StoredTokens, TokenStore};
use super::{decode_access_claims, fingerprint, AccessClaims};
use crate::api::endpoints;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, User};

/// Read-only snapshot of the current session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Holds the current user and tokens, and owns login/logout/refresh.
///
/// Construct once with [`SessionStore::restore`] and share it (behind an
/// `Arc`) with everything that makes authenticated calls.
pub struct SessionStore {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
    // Serialises refreshes so concurrent 401s share one exchange
    refresh_gate: Mutex<()>,
}

impl SessionStore {
    /// Build a session from whatever tokens survived the last run
    pub async fn restore(base_url: Url, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::config::config().api.timeout_secs))
            .build()?;
        Self::restore_with_client(http, base_url, store).await
    }

    pub async fn restore_with_client(
        http: reqwest::Client,
        base_url: Url,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let tokens = store.load().await?;
        tracing::debug!(
            "restored session (access token: {}, refresh token: {})",
            tokens.access_token.is_some(),
            tokens.refresh_token.as_deref().map(fingerprint).unwrap_or_else(|| "none".to_string())
        );

        Ok(Self {
            http,
            base_url,
            store,
            state: RwLock::new(SessionState {
                user: None,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            }),
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn session(&self) -> Session {
        let state = self.state.read().await;
        Session {
            user: state.user.clone(),
            access_token: state.access_token.clone(),
        }
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    pub async fn has_refresh_token(&self) -> bool {
        self.state.read().await.refresh_token.is_some()
    }

    pub async fn access_claims(&self) -> Option<AccessClaims> {
        let token = self.access_token().await?;
        decode_access_claims(&token).ok()
    }

    pub async fn set_user(&self, user: Option<User>) {
        self.state.write().await.user = user;
    }

    /// Exchange credentials for tokens. Never errors: any failure is
    /// logged and reported as `false`.
    pub async fn login(&self, identifier: &str, password: &str) -> bool {
        match self.try_login(identifier, password).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("login failed for '{}': {}", identifier, e);
                false
            }
        }
    }

    async fn try_login(&self, identifier: &str, password: &str) -> Result<(), ApiError> {
        let url = self.base_url.join(endpoints::AUTH_LOGIN)?;
        let resp = self
            .http
            .post(url)
            .json(&LoginRequest { username: identifier.trim(), password })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<serde_json::Value>().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        let login: LoginResponse = resp.json().await?;
        self.adopt_tokens(login.access, Some(login.refresh), login.user).await
    }

    /// Install tokens obtained elsewhere (login, registration) and persist them
    pub async fn adopt_tokens(
        &self,
        access: String,
        refresh: Option<String>,
        user: Option<User>,
    ) -> Result<(), ApiError> {
        self.store.save(&StoredTokens::new(access.clone(), refresh.clone())).await?;

        let mut state = self.state.write().await;
        state.access_token = Some(access);
        state.refresh_token = refresh;
        state.user = user;
        Ok(())
    }

    /// Forget everything, locally and on disk. No server call is made.
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::error!("failed to clear persisted tokens: {}", e);
        }
        *self.state.write().await = SessionState::default();
    }

    /// Exchange the refresh token for a new access token
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;
        self.exchange_refresh_token().await
    }

    /// Refresh after a 401 that was produced with `stale`. If another caller
    /// rotated the token while we waited on the gate, reuse theirs.
    pub(crate) async fn refresh_after_unauthorized(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.access_token().await {
            if Some(current.as_str()) != stale {
                tracing::debug!("access token already rotated by a concurrent request");
                return Ok(current);
            }
        }

        self.exchange_refresh_token().await
    }

    async fn exchange_refresh_token(&self) -> Result<String, ApiError> {
        let refresh = self
            .state
            .read()
            .await
            .refresh_token
            .clone()
            .ok_or_else(|| ApiError::session_expired("no refresh token"))?;

        let key = fingerprint(&refresh);
        tracing::debug!("refreshing access token with refresh token {}", key);

        let url = self.base_url.join(endpoints::TOKEN_REFRESH)?;
        let resp = self
            .http
            .post(url)
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("token refresh request failed: {}", e);
                ApiError::session_expired(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!("token refresh rejected ({}) for refresh token {}", status, key);
            return Err(ApiError::session_expired(format!("refresh rejected with status {}", status.as_u16())));
        }

        let body: RefreshResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::session_expired(format!("unreadable refresh response: {}", e)))?;

        let rotated = body.refresh.unwrap_or(refresh);
        self.store
            .save(&StoredTokens::new(body.access.clone(), Some(rotated.clone())))
            .await?;

        let mut state = self.state.write().await;
        state.access_token = Some(body.access.clone());
        state.refresh_token = Some(rotated);
        Ok(body.access)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("base_url", &self.base_url.as_str()).finish()
    }
}
