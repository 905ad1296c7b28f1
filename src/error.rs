// Client-side error taxonomy for backend calls
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Field name -> message, ordered so output is stable
pub type FieldErrors = BTreeMap<String, String>;

/// Failure half of every request made through the API client.
///
/// Success is always `ApiResponse<T>`; callers branch on the variant
/// instead of guessing whether an empty body meant "no data" or "failed".
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    // Caught client-side before any network call
    #[error("{message}")]
    Validation { message: String, field_errors: FieldErrors },

    // 401 that could not be recovered with a refresh
    #[error("{0}")]
    Unauthorized(String),

    // Refresh token missing or rejected; user must log in again
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    // Any other non-2xx response, with backend field errors when present
    #[error("{message}")]
    Http { status: u16, message: String, field_errors: FieldErrors },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // The owning view closed before the request resolved
    #[error("Request cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// HTTP status code, or 0 for failures that never produced a response
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::SessionExpired(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Http { status, .. } => *status,
            ApiError::Network(_) => 0,
            ApiError::Decode(_) => 0,
            ApiError::Cancelled => 0,
            ApiError::Storage(_) => 0,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::SessionExpired(_) => "SESSION_EXPIRED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Http { status, .. } if *status >= 500 => "SERVER_ERROR",
            ApiError::Http { .. } => "BAD_REQUEST",
            ApiError::Network(_) => "NETWORK_ERROR",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::Cancelled => "CANCELLED",
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Field-level messages, empty when the failure was not field-specific
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { field_errors, .. } | ApiError::Http { field_errors, .. }
                if !field_errors.is_empty() =>
            {
                Some(field_errors)
            }
            _ => None,
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors().and_then(|errors| errors.get(field)).map(String::as_str)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code(),
        });

        if let Some(field_errors) = self.field_errors() {
            response["field_errors"] = json!(field_errors);
        }

        response
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        ApiError::Validation { message: message.into(), field_errors }
    }

    /// Single-field validation failure; the message doubles as the field message
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = FieldErrors::new();
        field_errors.insert(field.to_string(), message.clone());
        ApiError::Validation { message, field_errors }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn session_expired(message: impl Into<String>) -> Self {
        ApiError::SessionExpired(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::Storage(message.into())
    }

    /// Build an error from a non-2xx response body.
    ///
    /// DRF-style bodies are understood: `{"detail": "..."}` or
    /// `{"phone": ["Enter a valid phone number."], ...}`.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let (message, field_errors) = parse_error_body(body);
        let message = message
            .or_else(|| field_errors.values().next().cloned())
            .unwrap_or_else(|| default_status_message(status).to_string());

        match status {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Http { status, message, field_errors },
        }
    }
}

const GENERAL_KEYS: [&str; 4] = ["detail", "message", "error", "non_field_errors"];

fn parse_error_body(body: &Value) -> (Option<String>, FieldErrors) {
    let mut general = None;
    let mut field_errors = FieldErrors::new();

    match body {
        Value::String(s) if !s.trim().is_empty() => general = Some(s.clone()),
        Value::Object(obj) => {
            for (key, value) in obj {
                let Some(text) = first_message(value) else { continue };
                if GENERAL_KEYS.contains(&key.as_str()) {
                    general.get_or_insert(text);
                } else {
                    field_errors.insert(key.clone(), text);
                }
            }
        }
        _ => {}
    }

    (general, field_errors)
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        Value::Bool(_) | Value::Number(_) | Value::Null | Value::Object(_) => None,
    }
}

fn default_status_message(status: u16) -> &'static str {
    match status {
        400 => "The request was rejected",
        401 => "Authentication required",
        403 => "You do not have permission to do that",
        404 => "Not found",
        409 => "Conflict with existing data",
        429 => "Too many requests",
        500..=599 => "The server encountered an error",
        _ => "Request failed",
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::Network(format!("invalid URL: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_take_first_array_entry() {
        let body = json!({"phone": ["Enter a valid phone number.", "second"], "email": "taken"});
        let err = ApiError::from_response(400, &body);
        assert_eq!(err.field_error("phone"), Some("Enter a valid phone number."));
        assert_eq!(err.field_error("email"), Some("taken"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn detail_becomes_general_message() {
        let err = ApiError::from_response(403, &json!({"detail": "Admins only"}));
        assert!(matches!(err, ApiError::Forbidden(ref m) if m == "Admins only"));
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn empty_body_falls_back_to_status_text() {
        let err = ApiError::from_response(502, &Value::Null);
        assert_eq!(err.message(), "The server encountered an error");
        assert_eq!(err.error_code(), "SERVER_ERROR");
    }

    #[test]
    fn to_json_includes_field_errors_only_when_present() {
        let err = ApiError::invalid_field("member_id", "Member ID must contain only digits");
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["member_id"], "Member ID must contain only digits");

        let plain = ApiError::Network("connection refused".into()).to_json();
        assert!(plain.get("field_errors").is_none());
    }
}
