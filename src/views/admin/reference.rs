use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Industry, IndustryDraft, LocalGroup, LocalGroupDraft};
use crate::validation::Validator;
use crate::views::Confirm;

/// A reference list the admin panel can edit in place
#[async_trait]
pub trait ReferenceEntity: Clone + std::fmt::Debug + Serialize + Send + Sync + Sized + 'static {
    type Draft: Clone + std::fmt::Debug + Default + PartialEq + Send + Sync + for<'a> From<&'a Self>;

    const LABEL: &'static str;

    fn id(&self) -> i64;
    fn validate(draft: &Self::Draft) -> Result<(), ApiError>;

    async fn list(client: &ApiClient) -> Result<Vec<Self>, ApiError>;
    async fn create(client: &ApiClient, draft: &Self::Draft) -> Result<Self, ApiError>;
    async fn update(client: &ApiClient, id: i64, draft: &Self::Draft) -> Result<Self, ApiError>;
    async fn delete(client: &ApiClient, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
impl ReferenceEntity for Industry {
    type Draft = IndustryDraft;

    const LABEL: &'static str = "industry";

    fn id(&self) -> i64 {
        self.id
    }

    fn validate(draft: &IndustryDraft) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.required(&draft.name, "name", "Industry name is required");
        v.finish()
    }

    async fn list(client: &ApiClient) -> Result<Vec<Self>, ApiError> {
        client.industries().await
    }

    async fn create(client: &ApiClient, draft: &IndustryDraft) -> Result<Self, ApiError> {
        Ok(client.create_industry(draft).await?.into_data())
    }

    async fn update(client: &ApiClient, id: i64, draft: &IndustryDraft) -> Result<Self, ApiError> {
        Ok(client.update_industry(id, draft).await?.into_data())
    }

    async fn delete(client: &ApiClient, id: i64) -> Result<(), ApiError> {
        client.delete_industry(id).await.map(|_| ())
    }
}

#[async_trait]
impl ReferenceEntity for LocalGroup {
    type Draft = LocalGroupDraft;

    const LABEL: &'static str = "local group";

    fn id(&self) -> i64 {
        self.id
    }

    fn validate(draft: &LocalGroupDraft) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.required(&draft.name, "name", "Group name is required")
            .required(&draft.number, "number", "Group number is required");
        v.finish()
    }

    async fn list(client: &ApiClient) -> Result<Vec<Self>, ApiError> {
        client.local_groups().await
    }

    async fn create(client: &ApiClient, draft: &LocalGroupDraft) -> Result<Self, ApiError> {
        Ok(client.create_local_group(draft).await?.into_data())
    }

    async fn update(client: &ApiClient, id: i64, draft: &LocalGroupDraft) -> Result<Self, ApiError> {
        Ok(client.update_local_group(id, draft).await?.into_data())
    }

    async fn delete(client: &ApiClient, id: i64) -> Result<(), ApiError> {
        client.delete_local_group(id).await.map(|_| ())
    }
}

/// One CRUD tab: rows fetched on first activation, per-row edit buffers
/// keyed by id, and a "new" draft that only clears after a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceTable<E: ReferenceEntity> {
    rows: Option<Vec<E>>,
    #[serde(skip)]
    edits: HashMap<i64, E::Draft>,
    #[serde(skip)]
    pub draft: E::Draft,
    pub error: Option<String>,
}

impl<E: ReferenceEntity> Default for ReferenceTable<E> {
    fn default() -> Self {
        Self { rows: None, edits: HashMap::new(), draft: E::Draft::default(), error: None }
    }
}

impl<E: ReferenceEntity> ReferenceTable<E> {
    pub fn is_loaded(&self) -> bool {
        self.rows.is_some()
    }

    pub fn rows(&self) -> &[E] {
        self.rows.as_deref().unwrap_or_default()
    }

    /// Fetch on first use only; later calls keep the cached rows
    pub async fn ensure_loaded(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        if self.rows.is_none() {
            let rows = E::list(client).await?;
            tracing::debug!("loaded {} {} rows", rows.len(), E::LABEL);
            self.rows = Some(rows);
        }
        Ok(())
    }

    pub fn begin_edit(&mut self, id: i64) -> Option<&mut E::Draft> {
        let row = self.rows().iter().find(|r| r.id() == id)?.clone();
        Some(self.edits.entry(id).or_insert_with(|| E::Draft::from(&row)))
    }

    pub fn edit_mut(&mut self, id: i64) -> Option<&mut E::Draft> {
        self.edits.get_mut(&id)
    }

    pub fn is_editing(&self, id: i64) -> bool {
        self.edits.contains_key(&id)
    }

    pub fn cancel_edit(&mut self, id: i64) {
        self.edits.remove(&id);
    }

    pub async fn save_edit(&mut self, id: i64, client: &ApiClient) -> Result<E, ApiError> {
        self.error = None;
        let draft = self
            .edits
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("No pending edit for {} {}", E::LABEL, id)))?;
        E::validate(&draft).inspect_err(|e| self.error = Some(e.message()))?;

        let saved = E::update(client, id, &draft).await.inspect_err(|e| self.error = Some(e.message()))?;
        if let Some(row) = self.rows.as_mut().and_then(|rows| rows.iter_mut().find(|r| r.id() == id)) {
            *row = saved.clone();
        }
        self.edits.remove(&id);
        Ok(saved)
    }

    pub async fn create(&mut self, client: &ApiClient) -> Result<E, ApiError> {
        self.error = None;
        E::validate(&self.draft).inspect_err(|e| self.error = Some(e.message()))?;

        let created = E::create(client, &self.draft).await.inspect_err(|e| self.error = Some(e.message()))?;
        tracing::info!("created {} {}", E::LABEL, created.id());
        self.rows.get_or_insert_with(Vec::new).push(created.clone());
        self.draft = E::Draft::default();
        Ok(created)
    }

    /// Delete after confirmation; `Ok(false)` when the prompt was declined
    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm, client: &ApiClient) -> Result<bool, ApiError> {
        self.error = None;
        if !confirm.confirm(&format!("Are you sure you want to delete this {}?", E::LABEL)) {
            return Ok(false);
        }
        E::delete(client, id).await.inspect_err(|e| self.error = Some(e.message()))?;
        if let Some(rows) = self.rows.as_mut() {
            rows.retain(|r| r.id() != id);
        }
        self.edits.remove(&id);
        Ok(true)
    }
}
