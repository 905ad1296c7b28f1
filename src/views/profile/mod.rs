//! Profile editing for the caller (`/profile`) or, for admins, any member
//! (`/user/:id`). Member, Expert and Expertise tabs save independently.

mod expertise;
mod member;

pub use expertise::{ExpertiseEditor, OFFERING_REQUIRED, REMOVE_PROMPT};
pub use member::{MemberForm, MEMBER_FIELDS};

use std::path::Path;

use serde::Serialize;

use super::ViewScope;
use crate::api::{ApiClient, PhotoUpload, ProfileTarget};
use crate::error::ApiError;
use crate::models::{Expert, ExpertUpdate, Expertise, Industry, LocalGroup, User};
use crate::validation::{photo_mime, validate_photo};

pub const PROFILE_SAVED: &str = "Profile updated successfully";
pub const EXPERT_SAVED: &str = "Expert profile updated successfully";
pub const PHOTO_SAVED: &str = "Profile photo updated";
pub const EXPERT_LOAD_ERROR: &str = "Failed to load expert profile.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileTab {
    Member,
    Expert,
    Expertise,
}

#[derive(Debug)]
pub struct ProfileEditor {
    scope: ViewScope,
    target: ProfileTarget,
    user: User,
    pub member: MemberForm,
    expert_record: Option<Expert>,
    pub expert: Option<ExpertUpdate>,
    pub expertise: Option<ExpertiseEditor>,
    local_groups: Vec<LocalGroup>,
    industries: Vec<Industry>,
    tab: ProfileTab,
    pub notice: Option<String>,
    /// Set when the expert block failed to load; the expert tabs stay hidden
    pub expert_error: Option<String>,
}

struct Loaded {
    user: User,
    expert: Option<(Expert, Vec<Expertise>)>,
    expert_error: Option<String>,
    local_groups: Vec<LocalGroup>,
    industries: Vec<Industry>,
}

impl ProfileEditor {
    pub async fn load(client: &ApiClient, target: ProfileTarget) -> Result<Self, ApiError> {
        let scope = ViewScope::new();
        let loaded = scope.run(fetch(client, target)).await?;
        let admin_edit = matches!(target, ProfileTarget::Member(_));

        let (expert_record, expert, expertise) = match loaded.expert {
            Some((record, records)) => {
                let editor = ExpertiseEditor::new(record.id, &records);
                (Some(record.clone()), Some(ExpertUpdate::from(&record)), Some(editor))
            }
            None => (None, None, None),
        };

        Ok(Self {
            scope,
            target,
            member: MemberForm::from_user(&loaded.user, admin_edit),
            user: loaded.user,
            expert_record,
            expert,
            expertise,
            local_groups: loaded.local_groups,
            industries: loaded.industries,
            tab: ProfileTab::Member,
            notice: None,
            expert_error: loaded.expert_error,
        })
    }

    pub fn target(&self) -> ProfileTarget {
        self.target
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn expert_record(&self) -> Option<&Expert> {
        self.expert_record.as_ref()
    }

    pub fn local_groups(&self) -> &[LocalGroup] {
        &self.local_groups
    }

    pub fn industries(&self) -> &[Industry] {
        &self.industries
    }

    /// Expert and Expertise tabs only exist for experts
    pub fn visible_tabs(&self) -> Vec<ProfileTab> {
        if self.expert.is_some() {
            vec![ProfileTab::Member, ProfileTab::Expert, ProfileTab::Expertise]
        } else {
            vec![ProfileTab::Member]
        }
    }

    pub fn active_tab(&self) -> ProfileTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: ProfileTab) -> bool {
        if !self.visible_tabs().contains(&tab) {
            return false;
        }
        self.tab = tab;
        true
    }

    pub async fn save_member(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        self.notice = None;
        let update = match self.member.validate(&self.local_groups) {
            Ok(update) => update,
            Err(e) => {
                self.member.apply_error(&e);
                return Err(e);
            }
        };

        match self.scope.run(client.update_user(self.target, &update)).await {
            Ok(resp) => {
                self.user = resp.into_data();
                self.member = MemberForm::from_user(&self.user, matches!(self.target, ProfileTarget::Member(_)));
                self.notice = Some(PROFILE_SAVED.to_string());
                tracing::info!("updated member profile for user {}", self.user.id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("member profile save failed: {}", e);
                self.member.apply_error(&e);
                Err(e)
            }
        }
    }

    pub async fn save_expert(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        self.notice = None;
        let update = self.expert.clone().ok_or_else(|| ApiError::not_found("This member is not an expert"))?;
        let saved = self.scope.run(client.update_expert(self.target, &update)).await?.into_data();
        self.expert = Some(ExpertUpdate::from(&saved));
        self.expert_record = Some(saved);
        self.notice = Some(EXPERT_SAVED.to_string());
        Ok(())
    }

    /// Upload a new photo. Size and type are checked before any request is
    /// made; a rejected file leaves the current photo untouched.
    pub async fn upload_photo(&mut self, client: &ApiClient, file_name: &str, bytes: Vec<u8>) -> Result<(), ApiError> {
        let mime = photo_mime(Path::new(file_name));
        validate_photo(mime, bytes.len() as u64).map_err(|m| ApiError::invalid_field("profile_photo", m))?;

        let photo = PhotoUpload {
            file_name: file_name.to_string(),
            mime: mime.unwrap_or("application/octet-stream").to_string(),
            bytes,
        };
        let resp = self.scope.run(client.upload_photo(self.user.id, photo)).await?;
        if let Some(url) = resp.data.get("profile_photo").and_then(|v| v.as_str()) {
            self.user.profile_photo = Some(url.to_string());
        }
        self.notice = Some(PHOTO_SAVED.to_string());
        Ok(())
    }

    /// Same as [`upload_photo`](Self::upload_photo) but reads from disk,
    /// checking the size before reading the file.
    pub async fn upload_photo_file(&mut self, client: &ApiClient, path: &Path) -> Result<(), ApiError> {
        let size = tokio::fs::metadata(path).await?.len();
        validate_photo(photo_mime(path), size).map_err(|m| ApiError::invalid_field("profile_photo", m))?;

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_string();
        self.upload_photo(client, &file_name, bytes).await
    }
}

async fn fetch(client: &ApiClient, target: ProfileTarget) -> Result<Loaded, ApiError> {
    let user = client.profile_user(target).await?;

    let expert = async {
        if !user.is_expert {
            return Ok(None);
        }
        let expert = client.profile_expert(target).await?;
        let records = client.expertises_by_expert(expert.id).await?;
        Ok::<_, ApiError>(Some((expert, records)))
    };
    let (expert, local_groups, industries) =
        futures::join!(expert, client.local_groups(), client.industries());

    let (expert, expert_error) = match expert {
        Ok(expert) => (expert, None),
        Err(e) if e.is_cancelled() => return Err(e),
        Err(e) => {
            tracing::warn!("could not load expert profile for user {}: {}", user.id, e);
            (None, Some(EXPERT_LOAD_ERROR.to_string()))
        }
    };

    Ok(Loaded {
        expert,
        expert_error,
        local_groups: local_groups.unwrap_or_else(|e| {
            tracing::warn!("could not load local groups: {}", e);
            Vec::new()
        }),
        industries: industries.unwrap_or_else(|e| {
            tracing::warn!("could not load industries: {}", e);
            Vec::new()
        }),
        user,
    })
}
