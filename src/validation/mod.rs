//! Client-side field checks. Nothing here touches the network; failures
//! are reported as `ApiError::Validation` so views can show them inline.

pub mod phone;
pub mod photo;

pub use phone::{format_phone, from_e164, to_e164, validate_phone};
pub use photo::{photo_mime, validate_photo, MAX_PHOTO_BYTES};

use crate::error::{ApiError, FieldErrors};

pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const MEMBER_ID_REQUIRED: &str = "Member ID is required";
pub const MEMBER_ID_NUMERIC: &str = "Member ID must contain only numbers";
pub const CITY_REQUIRED: &str = "City is required";
pub const STATE_REQUIRED: &str = "State is required";
pub const STATE_INVALID: &str = "Please select a valid state";
pub const LOCAL_GROUP_REQUIRED: &str = "Local group is required";
pub const LOCAL_GROUP_INVALID: &str = "Please select a valid local group";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const CONFIRM_PASSWORD_REQUIRED: &str = "Please confirm your password";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Minimal `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn is_numeric_id(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Collects per-field messages, keeping only the first message per field.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
    first: Option<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        let message = message.into();
        if self.first.is_none() {
            self.first = Some(message.clone());
        }
        self.errors.entry(field.to_string()).or_insert(message);
        self
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.fail(field, message);
        }
        self
    }

    pub fn required(&mut self, value: &str, field: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, message)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// All collected messages; the summary message is the first failure seen.
    pub fn finish(self) -> Result<(), ApiError> {
        match self.first {
            None => Ok(()),
            Some(first) => Err(ApiError::validation(first, self.errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ada@example.org"));
        assert!(is_valid_email("  ada.l@mail.example.co.uk "));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("@example.org"));
        assert!(!is_valid_email("ada@.org"));
        assert!(!is_valid_email("ada@example."));
        assert!(!is_valid_email("ada lovelace@example.org"));
        assert!(!is_valid_email("a@b@c.org"));
    }

    #[test]
    fn numeric_ids() {
        assert!(is_numeric_id("0012345"));
        assert!(!is_numeric_id(""));
        assert!(!is_numeric_id("12a45"));
    }

    #[test]
    fn validator_reports_first_failure_as_summary() {
        let mut v = Validator::new();
        v.required("", "first_name", "First name is required")
            .required("", "last_name", "Last name is required")
            .fail("first_name", "ignored second message");
        let err = v.finish().unwrap_err();
        assert_eq!(err.message(), "First name is required");
        assert_eq!(err.field_error("first_name"), Some("First name is required"));
        assert_eq!(err.field_error("last_name"), Some("Last name is required"));
    }
}
