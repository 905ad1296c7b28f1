use serde::Serialize;

use super::connection::ConnectionRequestForm;
use super::{ViewScope, ViewState, PENDING_MESSAGE, PENDING_TITLE};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Expert, Expertise};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpertProfile {
    pub expert: Expert,
    pub expertise: Vec<Expertise>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpertScreen {
    PendingVerification { title: &'static str, message: &'static str },
    Loading,
    Error { message: String },
    Profile { profile: ExpertProfile, can_send_message: bool },
}

/// The `/expert/:id` view, keyed by the expert's user id
#[derive(Debug)]
pub struct ExpertDetail {
    scope: ViewScope,
    user_id: i64,
    pending: bool,
    state: ViewState<ExpertProfile>,
}

impl ExpertDetail {
    pub async fn open(client: &ApiClient, user_id: i64) -> Self {
        let pending = client.session().user().await.map(|u| u.is_pending()).unwrap_or(false);
        let mut view = Self { scope: ViewScope::new(), user_id, pending, state: ViewState::Loading };
        if pending {
            return view;
        }

        match view.scope.run(fetch_profile(client, user_id)).await {
            Ok(profile) => view.state = ViewState::Ready(profile),
            Err(ApiError::Cancelled) => {}
            Err(ApiError::NotFound(_)) => view.state = ViewState::Error("Expert not found".to_string()),
            Err(e) => {
                tracing::error!("failed to load expert for user {}: {}", user_id, e);
                view.state = ViewState::Error("Failed to load expert profile.".to_string());
            }
        }
        view
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn can_send_message(&self) -> bool {
        !self.pending && self.state.ready().is_some()
    }

    /// A fresh contact form for this expert, unless the viewer is pending
    pub fn connection_form(&self) -> Option<ConnectionRequestForm> {
        if !self.can_send_message() {
            return None;
        }
        self.state.ready().map(|p| ConnectionRequestForm::new(p.expert.id))
    }

    pub fn screen(&self) -> ExpertScreen {
        if self.pending {
            return ExpertScreen::PendingVerification { title: PENDING_TITLE, message: PENDING_MESSAGE };
        }
        match &self.state {
            ViewState::Loading => ExpertScreen::Loading,
            ViewState::Error(message) => ExpertScreen::Error { message: message.clone() },
            ViewState::Ready(profile) => ExpertScreen::Profile {
                profile: profile.clone(),
                can_send_message: self.can_send_message(),
            },
        }
    }
}

async fn fetch_profile(client: &ApiClient, user_id: i64) -> Result<ExpertProfile, ApiError> {
    let expert = client.expert_by_user(user_id).await?;
    let expertise = client.expertises_by_expert(expert.id).await?;
    Ok(ExpertProfile { expert, expertise })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user_json, TestBackend};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn active_members_get_a_form_bound_to_the_expert_id() {
        let backend = TestBackend::logged_in_as(user_json(2, "active", "member", false)).await;
        Mock::given(method("GET"))
            .and(path("/api/experts/by_user/9/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 40, "user": 9, "occupation": "Nurse"})))
            .mount(&backend.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/expertises/by_expert/40/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "what_offering": "Triage advice"}])))
            .mount(&backend.server)
            .await;

        let view = ExpertDetail::open(&backend.client, 9).await;
        assert!(view.can_send_message());
        assert_eq!(view.connection_form().map(|f| f.expert_id()), Some(40));
        match view.screen() {
            ExpertScreen::Profile { profile, can_send_message } => {
                assert!(can_send_message);
                assert_eq!(profile.expertise.len(), 1);
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[tokio::test]
    async fn pending_members_cannot_message() {
        let backend = TestBackend::logged_in_as(user_json(2, "pending", "member", false)).await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&backend.server)
            .await;

        let view = ExpertDetail::open(&backend.client, 9).await;
        assert!(view.connection_form().is_none());
        assert!(matches!(view.screen(), ExpertScreen::PendingVerification { .. }));
    }

    #[tokio::test]
    async fn unknown_experts_show_not_found() {
        let backend = TestBackend::logged_in_as(user_json(2, "active", "member", false)).await;
        Mock::given(method("GET"))
            .and(path("/api/experts/by_user/404/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
            .mount(&backend.server)
            .await;

        let view = ExpertDetail::open(&backend.client, 404).await;
        assert_eq!(view.screen(), ExpertScreen::Error { message: "Expert not found".into() });
        assert!(view.connection_form().is_none());
    }
}
