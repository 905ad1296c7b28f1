use serde::Serialize;

use crate::api::ApiClient;
use crate::auth::Navigator;
use crate::error::ApiError;
use crate::routes::Route;
use crate::validation::Validator;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoginForm {
    pub identifier: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), password: password.into(), error: None }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.required(&self.identifier, "username", "Username or email is required")
            .check(!self.password.is_empty(), "password", "Password is required");
        v.finish()
    }

    /// Log in and land on the directory. Every account lands there; pending
    /// accounts see the verification notice instead of the list.
    pub async fn submit(&mut self, client: &ApiClient, navigator: &dyn Navigator) -> Result<Route, ApiError> {
        self.error = None;
        self.validate().inspect_err(|e| self.error = Some(e.message()))?;

        if !client.session().login(&self.identifier, &self.password).await {
            self.error = Some(INVALID_CREDENTIALS.to_string());
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        if client.session().user().await.is_none() {
            client.hydrate_session().await;
        }

        self.password.clear();
        navigator.navigate(Route::Experts);
        Ok(Route::Experts)
    }
}

/// `/logout`: forget the session and return to the login page
pub async fn logout(client: &ApiClient, navigator: &dyn Navigator) -> Route {
    client.session().logout().await;
    navigator.navigate(Route::Login);
    Route::Login
}
