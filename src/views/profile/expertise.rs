use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Expertise, ExpertiseDraft, MAX_EXPERTISE_RECORDS};
use crate::views::Confirm;

pub const OFFERING_REQUIRED: &str = "What you are offering is required";
pub const REMOVE_PROMPT: &str = "Are you sure you want to remove this expertise?";

/// Expertise tab: up to three records, each saved on its own
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpertiseEditor {
    expert_id: i64,
    records: Vec<ExpertiseDraft>,
}

impl ExpertiseEditor {
    /// The tab always shows at least one (possibly blank) record
    pub fn new(expert_id: i64, existing: &[Expertise]) -> Self {
        let mut records: Vec<ExpertiseDraft> =
            existing.iter().take(MAX_EXPERTISE_RECORDS).map(ExpertiseDraft::from).collect();
        if records.is_empty() {
            records.push(Self::blank(expert_id));
        }
        Self { expert_id, records }
    }

    fn blank(expert_id: i64) -> ExpertiseDraft {
        ExpertiseDraft { expert: Some(expert_id), ..Default::default() }
    }

    pub fn expert_id(&self) -> i64 {
        self.expert_id
    }

    pub fn records(&self) -> &[ExpertiseDraft] {
        &self.records
    }

    pub fn record_mut(&mut self, index: usize) -> Option<&mut ExpertiseDraft> {
        self.records.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drives the "maximum reached" indicator
    pub fn at_capacity(&self) -> bool {
        self.records.len() >= MAX_EXPERTISE_RECORDS
    }

    pub fn can_remove(&self) -> bool {
        self.records.len() > 1
    }

    /// Append a blank record. Does nothing once the cap is reached.
    pub fn add_blank(&mut self) -> bool {
        if self.at_capacity() {
            return false;
        }
        self.records.push(Self::blank(self.expert_id));
        true
    }

    fn record(&self, index: usize) -> Result<&ExpertiseDraft, ApiError> {
        self.records
            .get(index)
            .ok_or_else(|| ApiError::not_found(format!("No expertise record at position {}", index + 1)))
    }

    /// Create (POST) or update (PUT) one record
    pub async fn save(&mut self, index: usize, client: &ApiClient) -> Result<Expertise, ApiError> {
        let mut draft = self.record(index)?.clone();
        if draft.what_offering.trim().is_empty() {
            return Err(ApiError::invalid_field("what_offering", OFFERING_REQUIRED));
        }
        draft.expert = Some(self.expert_id);

        let saved = match draft.id {
            Some(id) => client.update_expertise(id, &draft).await?,
            None => client.create_expertise(&draft).await?,
        }
        .into_data();

        tracing::debug!("saved expertise {:?} for expert {}", saved.id, self.expert_id);
        self.records[index] = ExpertiseDraft::from(&saved);
        Ok(saved)
    }

    /// Remove a record after confirmation. Returns `false` if nothing was
    /// removed (last remaining record, or the prompt was declined).
    pub async fn remove(&mut self, index: usize, confirm: &dyn Confirm, client: &ApiClient) -> Result<bool, ApiError> {
        let id = self.record(index)?.id;
        if !self.can_remove() || !confirm.confirm(REMOVE_PROMPT) {
            return Ok(false);
        }
        if let Some(id) = id {
            client.delete_expertise(id).await?;
        }
        self.records.remove(index);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_blank_record() {
        let editor = ExpertiseEditor::new(4, &[]);
        assert_eq!(editor.len(), 1);
        assert!(editor.records()[0].is_blank());
        assert!(!editor.can_remove());
    }

    #[test]
    fn fourth_record_is_a_no_op() {
        let mut editor = ExpertiseEditor::new(4, &[]);
        assert!(editor.add_blank());
        assert!(!editor.at_capacity());
        assert!(editor.add_blank());
        assert!(editor.at_capacity());
        assert!(!editor.add_blank());
        assert_eq!(editor.len(), MAX_EXPERTISE_RECORDS);
    }

    #[test]
    fn existing_records_are_loaded_in_order() {
        let existing: Vec<Expertise> = (1..=2)
            .map(|i| Expertise { id: Some(i), what_offering: format!("offer {i}"), ..Default::default() })
            .collect();
        let editor = ExpertiseEditor::new(4, &existing);
        assert_eq!(editor.records().iter().map(|r| r.id).collect::<Vec<_>>(), vec![Some(1), Some(2)]);
        assert!(editor.can_remove());
    }

    mod backend {
        use super::super::*;
        use crate::testing::{user_json, TestBackend};
        use serde_json::json;
        use wiremock::matchers::{body_partial_json, method, path};
        use wiremock::{Mock, ResponseTemplate};

        #[tokio::test]
        async fn existing_records_update_and_new_ones_create() {
            let backend = TestBackend::logged_in_as(user_json(5, "active", "member", true)).await;
            Mock::given(method("PUT"))
                .and(path("/api/expertises/11/"))
                .and(body_partial_json(json!({"expert": 4, "what_offering": "Tax help"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 11, "expert": 4, "what_offering": "Tax help"})))
                .expect(1)
                .mount(&backend.server)
                .await;
            Mock::given(method("POST"))
                .and(path("/api/expertises/"))
                .and(body_partial_json(json!({"expert": 4, "what_offering": "Mock interviews"})))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12, "expert": 4, "what_offering": "Mock interviews"})))
                .expect(1)
                .mount(&backend.server)
                .await;

            let existing = [Expertise { id: Some(11), expert: Some(4), what_offering: "Taxes".into(), ..Default::default() }];
            let mut editor = ExpertiseEditor::new(4, &existing);
            editor.record_mut(0).unwrap().what_offering = "Tax help".into();
            editor.save(0, &backend.client).await.unwrap();

            assert!(editor.add_blank());
            editor.record_mut(1).unwrap().what_offering = "Mock interviews".into();
            let created = editor.save(1, &backend.client).await.unwrap();
            assert_eq!(created.id, Some(12));
            assert_eq!(editor.records()[1].id, Some(12));
        }

        #[tokio::test]
        async fn blank_offering_is_rejected_locally() {
            let backend = TestBackend::logged_in_as(user_json(5, "active", "member", true)).await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(201))
                .expect(0)
                .mount(&backend.server)
                .await;

            let mut editor = ExpertiseEditor::new(4, &[]);
            let err = editor.save(0, &backend.client).await.unwrap_err();
            assert_eq!(err.field_error("what_offering"), Some(OFFERING_REQUIRED));
        }

        #[tokio::test]
        async fn removal_needs_confirmation_and_a_second_record() {
            let backend = TestBackend::logged_in_as(user_json(5, "active", "member", true)).await;
            Mock::given(method("DELETE"))
                .and(path("/api/expertises/21/"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&backend.server)
                .await;

            let existing: Vec<Expertise> = [21, 22]
                .into_iter()
                .map(|id| Expertise { id: Some(id), what_offering: "x".into(), ..Default::default() })
                .collect();
            let mut editor = ExpertiseEditor::new(4, &existing);

            assert!(!editor.remove(0, &|_: &str| false, &backend.client).await.unwrap());
            assert_eq!(editor.len(), 2);
            assert!(editor.remove(0, &|_: &str| true, &backend.client).await.unwrap());
            assert_eq!(editor.len(), 1);
            assert!(!editor.remove(0, &|_: &str| true, &backend.client).await.unwrap());
            assert_eq!(editor.records()[0].id, Some(22));
        }
    }
}
