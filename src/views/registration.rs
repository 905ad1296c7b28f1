//! New-member registration: a details form, an optional expert-profile
//! step, then a "pending approval" completion screen.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ProfileTarget};
use crate::error::ApiError;
use crate::models::{ExpertUpdate, ExpertiseDraft, User, MAX_EXPERTISE_RECORDS};
use crate::routes::Route;
use crate::types::{is_us_state, Availability};
use crate::validation::{
    format_phone, is_numeric_id, is_valid_email, to_e164, validate_phone, CITY_REQUIRED, CONFIRM_PASSWORD_REQUIRED, EMAIL_INVALID,
    EMAIL_REQUIRED, FIRST_NAME_REQUIRED, LAST_NAME_REQUIRED, LOCAL_GROUP_REQUIRED, MEMBER_ID_NUMERIC,
    MEMBER_ID_REQUIRED, PASSWORD_MISMATCH, PASSWORD_REQUIRED, STATE_INVALID, STATE_REQUIRED,
};

pub const COMPLETE_MESSAGE: &str = "Thank you for registering! Your account is pending approval. \
    You will have full access to the expert directory once an administrator verifies your membership.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub member_id: String,
    pub city: String,
    pub state: String,
    pub local_group: Option<i64>,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
}

/// Body of `POST users/register/`. Passwords are sent exactly as entered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationPayload {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub member_id: String,
    pub city: String,
    pub state: String,
    pub local_group: i64,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Checks run in a fixed order and stop at the first failure
    pub fn validate(&self) -> Result<RegistrationPayload, ApiError> {
        fn fail<T>(field: &str, message: &str) -> Result<T, ApiError> {
            Err(ApiError::invalid_field(field, message))
        }

        if self.first_name.trim().is_empty() {
            return fail("first_name", FIRST_NAME_REQUIRED);
        }
        if self.last_name.trim().is_empty() {
            return fail("last_name", LAST_NAME_REQUIRED);
        }
        if self.email.trim().is_empty() {
            return fail("email", EMAIL_REQUIRED);
        }
        if !is_valid_email(&self.email) {
            return fail("email", EMAIL_INVALID);
        }
        if let Err(message) = validate_phone(&format_phone(&self.phone)) {
            return fail("phone", message);
        }
        if self.member_id.trim().is_empty() {
            return fail("member_id", MEMBER_ID_REQUIRED);
        }
        if !is_numeric_id(&self.member_id) {
            return fail("member_id", MEMBER_ID_NUMERIC);
        }
        if self.city.trim().is_empty() {
            return fail("city", CITY_REQUIRED);
        }
        if self.state.trim().is_empty() {
            return fail("state", STATE_REQUIRED);
        }
        if !is_us_state(self.state.trim()) {
            return fail("state", STATE_INVALID);
        }
        let Some(local_group) = self.local_group else {
            return fail("local_group", LOCAL_GROUP_REQUIRED);
        };
        if self.password.is_empty() {
            return fail("password", PASSWORD_REQUIRED);
        }
        if self.confirm_password.is_empty() {
            return fail("confirm_password", CONFIRM_PASSWORD_REQUIRED);
        }
        if self.password != self.confirm_password {
            return fail("confirm_password", PASSWORD_MISMATCH);
        }

        let email = self.email.trim().to_string();
        Ok(RegistrationPayload {
            username: email.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            phone: to_e164(&self.phone),
            member_id: self.member_id.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            local_group,
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}

/// Optional expert data collected right after registration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpertSetup {
    pub occupation: String,
    pub industry: Option<i64>,
    pub background: String,
    pub availability_status: Availability,
    pub expertise: Vec<ExpertiseDraft>,
}

impl ExpertSetup {
    pub fn add_expertise(&mut self) -> bool {
        if self.expertise.len() >= MAX_EXPERTISE_RECORDS {
            return false;
        }
        self.expertise.push(ExpertiseDraft::default());
        true
    }

    pub fn is_blank(&self) -> bool {
        self.occupation.trim().is_empty()
            && self.industry.is_none()
            && self.background.trim().is_empty()
            && self.expertise.iter().all(ExpertiseDraft::is_blank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStage {
    Details,
    ExpertProfile,
    Complete,
}

#[derive(Debug, Default, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationFlow {
    stage: RegistrationStage,
    pub form: RegistrationForm,
    pub expert: ExpertSetup,
    pub error: Option<String>,
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationFlow {
    pub fn new() -> Self {
        Self {
            stage: RegistrationStage::Details,
            form: RegistrationForm::default(),
            expert: ExpertSetup::default(),
            error: None,
        }
    }

    pub fn stage(&self) -> RegistrationStage {
        self.stage
    }

    /// Validate and register. Moves on to the expert-profile step on success.
    pub async fn submit_details(&mut self, client: &ApiClient) -> Result<RegistrationStage, ApiError> {
        self.error = None;
        let payload = self.form.validate().inspect_err(|e| self.error = Some(e.message()))?;

        let resp = client.register(&payload).await.inspect_err(|e| {
            tracing::warn!("registration for {} rejected: {}", payload.email, e);
            self.error = Some(e.message());
        })?;
        tracing::info!("registered new member {}", payload.email);

        let body: RegisterResponse = serde_json::from_value(resp.data).unwrap_or_default();
        if let Some(access) = body.access {
            client.session().adopt_tokens(access, body.refresh, body.user).await?;
        }

        self.stage = RegistrationStage::ExpertProfile;
        Ok(self.stage)
    }

    pub fn skip_expert_profile(&mut self) -> Route {
        self.stage = RegistrationStage::Complete;
        Route::RegisterComplete
    }

    /// Seed the expert record and any non-blank expertise entries
    pub async fn submit_expert_profile(&mut self, client: &ApiClient) -> Result<Route, ApiError> {
        if self.stage != RegistrationStage::ExpertProfile {
            return Err(ApiError::validation("Complete the registration form first", Default::default()));
        }
        if self.expert.is_blank() {
            return Ok(self.skip_expert_profile());
        }

        if client.session().access_token().await.is_none()
            && !client.session().login(self.form.email.trim(), &self.form.password).await
        {
            let err = ApiError::unauthorized("Could not sign in to save your expert profile");
            self.error = Some(err.message());
            return Err(err);
        }

        let update = ExpertUpdate {
            occupation: self.expert.occupation.trim().to_string(),
            industry: self.expert.industry,
            background: self.expert.background.trim().to_string(),
            availability_status: self.expert.availability_status,
            show_contact_info: false,
        };
        let expert = client
            .update_expert(ProfileTarget::Me, &update)
            .await
            .inspect_err(|e| self.error = Some(e.message()))?
            .into_data();

        // Records saved by an earlier attempt keep their id and are not posted again
        let filled: Vec<usize> = self
            .expert
            .expertise
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_blank())
            .map(|(i, _)| i)
            .take(MAX_EXPERTISE_RECORDS)
            .collect();
        for i in filled {
            if self.expert.expertise[i].id.is_some() {
                continue;
            }
            let draft = ExpertiseDraft { expert: Some(expert.id), ..self.expert.expertise[i].clone() };
            let saved = client
                .create_expertise(&draft)
                .await
                .inspect_err(|e| self.error = Some(e.message()))?
                .into_data();
            self.expert.expertise[i].id = saved.id;
            self.expert.expertise[i].expert = Some(expert.id);
        }

        Ok(self.skip_expert_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegistrationForm {
        RegistrationForm {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.org".into(),
            phone: "(212) 867-0199".into(),
            member_id: "778899".into(),
            city: "New York".into(),
            state: "NY".into(),
            local_group: Some(1),
            password: "Cobol!1959 ".into(),
            confirm_password: "Cobol!1959 ".into(),
        }
    }

    #[test]
    fn reports_only_the_first_failure() {
        let mut form = valid();
        form.last_name.clear();
        form.member_id = "abc".into();
        let err = form.validate().unwrap_err();
        assert_eq!(err.message(), LAST_NAME_REQUIRED);
        assert_eq!(err.field_errors().map(|f| f.len()), Some(1));
    }

    #[test]
    fn validation_order_is_fixed() {
        let mut form = RegistrationForm::default();
        let expected = [
            FIRST_NAME_REQUIRED,
            LAST_NAME_REQUIRED,
            EMAIL_REQUIRED,
            EMAIL_INVALID,
            MEMBER_ID_REQUIRED,
            MEMBER_ID_NUMERIC,
            CITY_REQUIRED,
            STATE_REQUIRED,
            STATE_INVALID,
            LOCAL_GROUP_REQUIRED,
            PASSWORD_REQUIRED,
            CONFIRM_PASSWORD_REQUIRED,
            PASSWORD_MISMATCH,
        ];
        let fixes: [fn(&mut RegistrationForm); 13] = [
            |f: &mut RegistrationForm| f.first_name = "A".into(),
            |f: &mut RegistrationForm| f.last_name = "B".into(),
            |f: &mut RegistrationForm| f.email = "nope".into(),
            |f: &mut RegistrationForm| f.email = "a@b.org".into(),
            |f: &mut RegistrationForm| f.member_id = "12x".into(),
            |f: &mut RegistrationForm| f.member_id = "12".into(),
            |f: &mut RegistrationForm| f.city = "Town".into(),
            |f: &mut RegistrationForm| f.state = "ZZ".into(),
            |f: &mut RegistrationForm| f.state = "OH".into(),
            |f: &mut RegistrationForm| f.local_group = Some(2),
            |f: &mut RegistrationForm| f.password = "pw".into(),
            |f: &mut RegistrationForm| f.confirm_password = "other".into(),
            |f: &mut RegistrationForm| f.confirm_password = "pw".into(),
        ];
        for (message, fix) in expected.iter().zip(fixes.iter()) {
            assert_eq!(form.validate().unwrap_err().message(), *message);
            fix(&mut form);
        }
        assert!(form.validate().is_ok());
    }

    #[test]
    fn passwords_are_sent_verbatim() {
        let payload = valid().validate().unwrap();
        assert_eq!(payload.password, "Cobol!1959 ");
        assert_eq!(payload.confirm_password, "Cobol!1959 ");
        assert_eq!(payload.phone.as_deref(), Some("+12128670199"));
        assert_eq!(payload.username, "grace@example.org");
    }

    #[test]
    fn expert_setup_caps_expertise() {
        let mut setup = ExpertSetup::default();
        assert!(setup.is_blank());
        for _ in 0..MAX_EXPERTISE_RECORDS {
            assert!(setup.add_expertise());
        }
        assert!(!setup.add_expertise());
        assert!(setup.is_blank());
    }

    #[test]
    fn skipping_lands_on_completion() {
        let mut flow = RegistrationFlow::new();
        assert_eq!(flow.skip_expert_profile(), Route::RegisterComplete);
        assert_eq!(flow.stage(), RegistrationStage::Complete);
    }
}
