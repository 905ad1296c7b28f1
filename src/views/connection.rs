use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::ConnectionRequest;
use crate::types::ContactMethod;

pub const MIN_MESSAGE_LENGTH: usize = 10;
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters";
pub const SENT_MESSAGE: &str = "Your message has been sent. The expert will contact you using your preferred method.";
const SEND_FAILED: &str = "Failed to send your message. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FormStatus {
    Editing { error: Option<String> },
    Submitting,
    Sent { confirmation: &'static str },
}

/// "Contact this expert" form bound to one expert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionRequestForm {
    expert_id: i64,
    pub message: String,
    pub preferred_contact_method: Option<ContactMethod>,
    status: FormStatus,
}

impl ConnectionRequestForm {
    pub fn new(expert_id: i64) -> Self {
        Self {
            expert_id,
            message: String::new(),
            preferred_contact_method: None,
            status: FormStatus::Editing { error: None },
        }
    }

    pub fn expert_id(&self) -> i64 {
        self.expert_id
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_sent(&self) -> bool {
        matches!(self.status, FormStatus::Sent { .. })
    }

    pub fn validate(&self) -> Result<ConnectionRequest, ApiError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ApiError::invalid_field("message", MESSAGE_REQUIRED));
        }
        if message.chars().count() < MIN_MESSAGE_LENGTH {
            return Err(ApiError::invalid_field("message", MESSAGE_TOO_SHORT));
        }
        Ok(ConnectionRequest {
            expert_id: self.expert_id,
            message: message.to_string(),
            preferred_contact_method: self.preferred_contact_method,
        })
    }

    /// Validate and send. On failure the fields are kept so the user can
    /// correct and resubmit.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(e) => {
                self.status = FormStatus::Editing { error: Some(e.message()) };
                return Err(e);
            }
        };

        self.status = FormStatus::Submitting;
        match client.send_connection_request(&request).await {
            Ok(_) => {
                tracing::info!("connection request sent to expert {}", self.expert_id);
                self.status = FormStatus::Sent { confirmation: SENT_MESSAGE };
                Ok(())
            }
            Err(e) => {
                tracing::warn!("connection request to expert {} failed: {}", self.expert_id, e);
                let message = match &e {
                    ApiError::Http { .. } | ApiError::Validation { .. } => e.message(),
                    _ => SEND_FAILED.to_string(),
                };
                self.status = FormStatus::Editing { error: Some(message) };
                Err(e)
            }
        }
    }

    /// Cancel/close: clear every field and any error
    pub fn reset(&mut self) {
        *self = Self::new(self.expert_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_and_short_messages_have_distinct_errors() {
        let mut form = ConnectionRequestForm::new(4);
        assert_eq!(form.validate().unwrap_err().message(), MESSAGE_REQUIRED);

        form.message = "   ".into();
        assert_eq!(form.validate().unwrap_err().message(), MESSAGE_REQUIRED);

        form.message = "too short".into();
        let err = form.validate().unwrap_err();
        assert_eq!(err.message(), MESSAGE_TOO_SHORT);
        assert_eq!(err.field_error("message"), Some(MESSAGE_TOO_SHORT));

        form.message = "ten chars!".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn unset_contact_method_serializes_as_null() {
        let mut form = ConnectionRequestForm::new(4);
        form.message = "Could we talk about estate planning?".into();
        let payload = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(
            payload,
            json!({
                "expert_id": 4,
                "message": "Could we talk about estate planning?",
                "preferred_contact_method": null
            })
        );

        form.preferred_contact_method = Some(ContactMethod::VideoCall);
        let payload = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(payload["preferred_contact_method"], "video_call");
    }

    #[test]
    fn reset_clears_fields() {
        let mut form = ConnectionRequestForm::new(9);
        form.message = "Hello there, expert".into();
        form.preferred_contact_method = Some(ContactMethod::Phone);
        form.reset();
        assert_eq!(form, ConnectionRequestForm::new(9));
    }
}
