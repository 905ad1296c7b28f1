use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use super::response::ApiResponse;
use crate::auth::{Navigator, SessionStore};
use crate::error::ApiError;
use crate::routes::Route;

/// A profile photo ready for multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Request payload. Kept as owned data so the request can be rebuilt
/// for the single retry after a token refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Photo(PhotoUpload),
}

impl Body {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        Ok(Body::Json(serde_json::to_value(value)?))
    }
}

/// Authenticated request wrapper around the backend REST API.
///
/// Attaches the bearer token, and on a 401 refreshes once and retries the
/// original request once. A failed refresh navigates to `/login`.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::config::config().api.timeout_secs))
            .build()?;
        Ok(Self::with_http(http, session, navigator))
    }

    pub fn with_http(http: reqwest::Client, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { http, session, navigator }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Repopulate the session user from `users/me/` when a token survived
    /// a restart. Leaves the session anonymous on failure.
    pub async fn hydrate_session(&self) -> Option<crate::models::User> {
        if self.session.access_token().await.is_none() {
            return None;
        }
        match self.current_user().await {
            Ok(user) => {
                self.session.set_user(Some(user.clone())).await;
                Some(user)
            }
            Err(e) => {
                tracing::warn!("could not restore session user: {}", e);
                None
            }
        }
    }

    pub async fn request(&self, method: Method, path: &str, body: Body) -> Result<ApiResponse<Value>, ApiError> {
        let request_id = Uuid::new_v4();
        let url = self.session.base_url().join(path.trim_start_matches('/'))?;
        let token = self.session.access_token().await;

        let resp = self.send(&method, &url, &body, token.as_deref(), request_id).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Self::finish(resp, &method, &url, request_id).await;
        }

        if !self.session.has_refresh_token().await {
            tracing::warn!("[{}] {} {} unauthorized and no refresh token", request_id, method, url);
            self.navigator.navigate(Route::Login);
            return Err(ApiError::session_expired("not logged in"));
        }

        match self.session.refresh_after_unauthorized(token.as_deref()).await {
            Ok(fresh) => {
                tracing::debug!("[{}] retrying {} {} with refreshed token", request_id, method, url);
                let retry = self.send(&method, &url, &body, Some(&fresh), request_id).await?;
                Self::finish(retry, &method, &url, request_id).await
            }
            Err(e) => {
                tracing::error!("[{}] token refresh failed: {}", request_id, e);
                self.navigator.navigate(Route::Login);
                Err(e)
            }
        }
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        body: &Body,
        token: Option<&str>,
        request_id: Uuid,
    ) -> Result<reqwest::Response, ApiError> {
        if crate::config::config().api.enable_request_logging {
            tracing::debug!("[{}] {} {}", request_id, method, url);
        }

        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            // No explicit content type: reqwest sets the multipart boundary
            Body::Photo(photo) => {
                let part = reqwest::multipart::Part::bytes(photo.bytes.clone())
                    .file_name(photo.file_name.clone())
                    .mime_str(&photo.mime)?;
                builder.multipart(reqwest::multipart::Form::new().part("profile_photo", part))
            }
        };

        builder.send().await.map_err(|e| {
            tracing::error!("[{}] {} {} failed: {}", request_id, method, url, e);
            ApiError::Network(e.to_string())
        })
    }

    async fn finish(
        resp: reqwest::Response,
        method: &Method,
        url: &Url,
        request_id: Uuid,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("json"))
            .unwrap_or(false);

        let text = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let body = if is_json && !text.trim().is_empty() {
            serde_json::from_str(&text)?
        } else if status.is_success() {
            // Non-JSON success bodies (e.g. 204) normalise to an empty list
            Value::Array(Vec::new())
        } else {
            Value::String(text)
        };

        if status.is_success() {
            return Ok(ApiResponse::new(status.as_u16(), body));
        }

        tracing::warn!("[{}] {} {} returned {}", request_id, method, url, status);
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path, Body::Empty).await?;
        Ok(resp.decode()?.into_data())
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::POST, path, Body::json(body)?).await?.decode()
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::PUT, path, Body::json(body)?).await?.decode()
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::PATCH, path, Body::json(body)?).await?.decode()
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse<Value>, ApiError> {
        self.request(Method::DELETE, path, Body::Empty).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("session", &self.session).finish()
    }
}
