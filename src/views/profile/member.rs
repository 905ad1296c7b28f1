use serde::Serialize;

use crate::error::{ApiError, FieldErrors};
use crate::models::{LocalGroup, User, UserUpdate};
use crate::types::{is_us_state, Role, UserStatus};
use crate::validation::{
    format_phone, from_e164, is_numeric_id, is_valid_email, to_e164, validate_phone, Validator, CITY_REQUIRED,
    EMAIL_INVALID, EMAIL_REQUIRED, FIRST_NAME_REQUIRED, LAST_NAME_REQUIRED, LOCAL_GROUP_INVALID,
    LOCAL_GROUP_REQUIRED, MEMBER_ID_NUMERIC, MEMBER_ID_REQUIRED, PASSWORD_MISMATCH, STATE_INVALID, STATE_REQUIRED,
};

/// Backend field names the member tab can show inline
pub const MEMBER_FIELDS: [&str; 10] = [
    "first_name",
    "last_name",
    "email",
    "phone",
    "member_id",
    "city",
    "state",
    "local_group",
    "password",
    "confirm_password",
];

/// Member tab form. The phone is held in its display mask and only
/// converted to E.164 when the update is built. A stored number the user
/// never edits is sent back exactly as it was loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    phone: String,
    #[serde(skip_serializing)]
    stored_phone: Option<String>,
    #[serde(skip_serializing)]
    phone_edited: bool,
    pub member_id: String,
    pub city: String,
    pub state: String,
    pub local_group: Option<i64>,
    #[serde(skip_serializing)]
    pub new_password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    // Only populated on the admin edit path
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub errors: FieldErrors,
    pub general_error: Option<String>,
}

impl MemberForm {
    pub fn from_user(user: &User, admin_edit: bool) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.as_deref().map(display_phone).unwrap_or_default(),
            stored_phone: user.phone.clone().filter(|p| !p.trim().is_empty()),
            member_id: user.member_id.clone().unwrap_or_default(),
            city: user.city.clone().unwrap_or_default(),
            state: user.state.clone().unwrap_or_default(),
            local_group: user.local_group,
            role: admin_edit.then_some(user.role),
            status: admin_edit.then_some(user.status),
            ..Default::default()
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Accepts raw keystrokes; only digits survive and the mask is reapplied
    pub fn set_phone(&mut self, input: &str) {
        self.phone = format_phone(input);
        self.phone_edited = true;
    }

    fn keeps_stored_phone(&self) -> bool {
        !self.phone_edited && self.stored_phone.is_some()
    }

    /// Check every field, collecting all messages, and build the PATCH body
    pub fn validate(&self, local_groups: &[LocalGroup]) -> Result<UserUpdate, ApiError> {
        let mut v = Validator::new();
        v.required(&self.first_name, "first_name", FIRST_NAME_REQUIRED)
            .required(&self.last_name, "last_name", LAST_NAME_REQUIRED);

        if self.email.trim().is_empty() {
            v.fail("email", EMAIL_REQUIRED);
        } else if !is_valid_email(&self.email) {
            v.fail("email", EMAIL_INVALID);
        }

        if !self.keeps_stored_phone() {
            if let Err(message) = validate_phone(&self.phone) {
                v.fail("phone", message);
            }
        }

        if self.member_id.trim().is_empty() {
            v.fail("member_id", MEMBER_ID_REQUIRED);
        } else if !is_numeric_id(&self.member_id) {
            v.fail("member_id", MEMBER_ID_NUMERIC);
        }

        v.required(&self.city, "city", CITY_REQUIRED);

        if self.state.trim().is_empty() {
            v.fail("state", STATE_REQUIRED);
        } else if !is_us_state(self.state.trim()) {
            v.fail("state", STATE_INVALID);
        }

        match self.local_group {
            None => {
                v.fail("local_group", LOCAL_GROUP_REQUIRED);
            }
            Some(id) if !local_groups.is_empty() && !local_groups.iter().any(|g| g.id == id) => {
                v.fail("local_group", LOCAL_GROUP_INVALID);
            }
            Some(_) => {}
        }

        let changing_password = !self.new_password.is_empty() || !self.confirm_password.is_empty();
        if changing_password && self.new_password != self.confirm_password {
            v.fail("confirm_password", PASSWORD_MISMATCH);
        }

        v.finish()?;

        let password = changing_password.then(|| self.new_password.clone());
        let phone = if self.keeps_stored_phone() { self.stored_phone.clone() } else { to_e164(&self.phone) };
        Ok(UserUpdate {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone,
            member_id: self.member_id.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            local_group: self.local_group.unwrap_or_default(),
            confirm_password: password.clone(),
            password,
            role: self.role,
            status: self.status,
        })
    }

    /// Show a failed save: recognised fields inline, the rest as a banner
    pub fn apply_error(&mut self, err: &ApiError) {
        self.errors.clear();
        self.general_error = None;

        let mut unrecognised = Vec::new();
        if let Some(fields) = err.field_errors() {
            for (field, message) in fields {
                if MEMBER_FIELDS.contains(&field.as_str()) {
                    self.errors.insert(field.clone(), message.clone());
                } else {
                    unrecognised.push(format!("{}: {}", field, message));
                }
            }
        }

        if !unrecognised.is_empty() {
            self.general_error = Some(unrecognised.join("; "));
        } else if self.errors.is_empty() {
            self.general_error = Some(err.message());
        }
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.general_error = None;
    }
}

// Only US numbers fit the mask; anything else is shown as stored
fn display_phone(stored: &str) -> String {
    let stored = stored.trim();
    if stored.starts_with('+') && !stored.starts_with("+1") {
        stored.to_string()
    } else {
        from_e164(stored)
    }
}
