use serde::Serialize;

use crate::api::endpoints::PasswordResetConfirm;
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::routes::Route;
use crate::validation::{
    is_valid_email, Validator, CONFIRM_PASSWORD_REQUIRED, EMAIL_INVALID, EMAIL_REQUIRED, PASSWORD_MISMATCH,
    PASSWORD_REQUIRED,
};

pub const RESET_REQUESTED: &str =
    "If an account exists for that email, you will receive password reset instructions shortly.";
pub const RESET_COMPLETE: &str = "Your password has been reset. You can now log in.";
const LINK_INVALID: &str = "This password reset link is invalid or has expired";

/// `/forgot-password`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResetRequestForm {
    pub email: String,
    pub error: Option<String>,
    pub sent: bool,
}

impl ResetRequestForm {
    pub fn validate(&self) -> Result<(), ApiError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ApiError::invalid_field("email", EMAIL_REQUIRED));
        }
        if !is_valid_email(email) {
            return Err(ApiError::invalid_field("email", EMAIL_INVALID));
        }
        Ok(())
    }

    pub async fn submit(&mut self, client: &ApiClient) -> Result<&'static str, ApiError> {
        self.error = None;
        self.validate().inspect_err(|e| self.error = Some(e.message()))?;
        client
            .request_password_reset(self.email.trim())
            .await
            .inspect_err(|e| self.error = Some(e.message()))?;
        self.sent = true;
        Ok(RESET_REQUESTED)
    }
}

/// `/reset-password?uid=..&token=..`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResetConfirmForm {
    pub uid: String,
    pub token: String,
    #[serde(skip_serializing)]
    pub new_password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub error: Option<String>,
}

impl ResetConfirmForm {
    pub fn new(uid: impl Into<String>, token: impl Into<String>) -> Self {
        Self { uid: uid.into(), token: token.into(), ..Default::default() }
    }

    /// Read `uid` and `token` from the query string of a reset link
    pub fn from_link(link: &str) -> Result<Self, ApiError> {
        let url = url::Url::parse(link).or_else(|_| url::Url::parse("http://localhost/")?.join(link))?;
        let mut form = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "uid" => form.uid = value.into_owned(),
                "token" => form.token = value.into_owned(),
                _ => {}
            }
        }
        if form.uid.is_empty() || form.token.is_empty() {
            return Err(ApiError::validation(LINK_INVALID, Default::default()));
        }
        Ok(form)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.uid.is_empty() || self.token.is_empty() {
            return Err(ApiError::validation(LINK_INVALID, Default::default()));
        }
        let mut v = Validator::new();
        v.check(!self.new_password.is_empty(), "new_password", PASSWORD_REQUIRED)
            .check(!self.confirm_password.is_empty(), "confirm_password", CONFIRM_PASSWORD_REQUIRED);
        if !v.has_errors() && self.new_password != self.confirm_password {
            v.fail("confirm_password", PASSWORD_MISMATCH);
        }
        v.finish()
    }

    /// Returns where to go next (the login page) on success
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Route, ApiError> {
        self.error = None;
        self.validate().inspect_err(|e| self.error = Some(e.message()))?;
        let confirm = PasswordResetConfirm {
            uid: &self.uid,
            token: &self.token,
            new_password: &self.new_password,
            confirm_password: &self.confirm_password,
        };
        let result = client.confirm_password_reset(&confirm).await;
        if let Err(e) = result {
            self.error = Some(e.message());
            return Err(e);
        }
        tracing::info!("password reset confirmed for uid {}", self.uid);
        Ok(Route::Login)
    }
}
