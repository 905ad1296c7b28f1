// Typed calls for every backend endpoint the client consumes.
// Paths are relative to the configured API root.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::client::{ApiClient, Body, PhotoUpload};
use super::response::ApiResponse;
use crate::error::ApiError;
use crate::models::{
    AdminAction, ConnectionRequest, DirectoryExpert, Expert, ExpertUpdate, Expertise, ExpertiseDraft,
    Industry, IndustryDraft, LocalGroup, LocalGroupDraft, User, UserUpdate,
};

pub const AUTH_LOGIN: &str = "auth/login/";
pub const TOKEN_REFRESH: &str = "token/refresh/";
pub const USERS_ME: &str = "users/me/";
pub const USERS_ALL: &str = "users/all/";
pub const USERS_REGISTER: &str = "users/register/";
pub const USERS_EXPERTS: &str = "users/experts/";
pub const PASSWORD_RESET_REQUEST: &str = "users/password-reset-request/";
pub const PASSWORD_RESET_CONFIRM: &str = "users/password-reset-confirm/";
pub const EXPERTS_ME: &str = "experts/me/";
pub const EXPERTISES: &str = "expertises/";
pub const CONNECTION_REQUESTS: &str = "connection_requests/";
pub const INDUSTRIES: &str = "industries/";
pub const LOCAL_GROUPS: &str = "local_groups/";
pub const ADMIN_ACTIONS: &str = "admin_actions/";

/// Whose profile an edit targets: the caller, or (admin path) a member id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTarget {
    Me,
    Member(i64),
}

impl ProfileTarget {
    fn user_path(&self) -> String {
        match self {
            ProfileTarget::Me => USERS_ME.to_string(),
            ProfileTarget::Member(id) => format!("users/{}/", id),
        }
    }

    fn expert_path(&self) -> String {
        match self {
            ProfileTarget::Me => EXPERTS_ME.to_string(),
            ProfileTarget::Member(id) => format!("experts/by_user/{}/", id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm<'a> {
    pub uid: &'a str,
    pub token: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

impl ApiClient {
    // Users

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get(USERS_ME).await
    }

    pub async fn profile_user(&self, target: ProfileTarget) -> Result<User, ApiError> {
        self.get(&target.user_path()).await
    }

    pub async fn update_user(&self, target: ProfileTarget, update: &UserUpdate) -> Result<ApiResponse<User>, ApiError> {
        self.patch(&target.user_path(), update).await
    }

    pub async fn upload_photo(&self, user_id: i64, photo: PhotoUpload) -> Result<ApiResponse<Value>, ApiError> {
        self.request(Method::POST, &format!("users/{}/photo/", user_id), Body::Photo(photo)).await
    }

    pub async fn all_users(&self) -> Result<Vec<User>, ApiError> {
        self.get(USERS_ALL).await
    }

    pub async fn register<B: Serialize>(&self, payload: &B) -> Result<ApiResponse<Value>, ApiError> {
        self.post(USERS_REGISTER, payload).await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<ApiResponse<Value>, ApiError> {
        self.post(PASSWORD_RESET_REQUEST, &PasswordResetRequest { email }).await
    }

    pub async fn confirm_password_reset(&self, confirm: &PasswordResetConfirm<'_>) -> Result<ApiResponse<Value>, ApiError> {
        self.post(PASSWORD_RESET_CONFIRM, confirm).await
    }

    // Experts and expertise

    pub async fn expert_directory(&self) -> Result<Vec<DirectoryExpert>, ApiError> {
        self.get(USERS_EXPERTS).await
    }

    pub async fn profile_expert(&self, target: ProfileTarget) -> Result<Expert, ApiError> {
        self.get(&target.expert_path()).await
    }

    pub async fn expert_by_user(&self, user_id: i64) -> Result<Expert, ApiError> {
        self.profile_expert(ProfileTarget::Member(user_id)).await
    }

    pub async fn update_expert(&self, target: ProfileTarget, update: &ExpertUpdate) -> Result<ApiResponse<Expert>, ApiError> {
        self.patch(&target.expert_path(), update).await
    }

    pub async fn expertises_by_expert(&self, expert_id: i64) -> Result<Vec<Expertise>, ApiError> {
        self.get(&format!("expertises/by_expert/{}/", expert_id)).await
    }

    pub async fn create_expertise(&self, draft: &ExpertiseDraft) -> Result<ApiResponse<Expertise>, ApiError> {
        self.post(EXPERTISES, draft).await
    }

    pub async fn update_expertise(&self, id: i64, draft: &ExpertiseDraft) -> Result<ApiResponse<Expertise>, ApiError> {
        self.put(&format!("expertises/{}/", id), draft).await
    }

    pub async fn delete_expertise(&self, id: i64) -> Result<ApiResponse<Value>, ApiError> {
        self.delete(&format!("expertises/{}/", id)).await
    }

    pub async fn send_connection_request(&self, request: &ConnectionRequest) -> Result<ApiResponse<Value>, ApiError> {
        self.post(CONNECTION_REQUESTS, request).await
    }

    // Reference data

    pub async fn industries(&self) -> Result<Vec<Industry>, ApiError> {
        self.get(INDUSTRIES).await
    }

    pub async fn create_industry(&self, draft: &IndustryDraft) -> Result<ApiResponse<Industry>, ApiError> {
        self.post(INDUSTRIES, draft).await
    }

    pub async fn update_industry(&self, id: i64, draft: &IndustryDraft) -> Result<ApiResponse<Industry>, ApiError> {
        self.put(&format!("industries/{}/", id), draft).await
    }

    pub async fn delete_industry(&self, id: i64) -> Result<ApiResponse<Value>, ApiError> {
        self.delete(&format!("industries/{}/", id)).await
    }

    pub async fn local_groups(&self) -> Result<Vec<LocalGroup>, ApiError> {
        self.get(LOCAL_GROUPS).await
    }

    pub async fn create_local_group(&self, draft: &LocalGroupDraft) -> Result<ApiResponse<LocalGroup>, ApiError> {
        self.post(LOCAL_GROUPS, draft).await
    }

    pub async fn update_local_group(&self, id: i64, draft: &LocalGroupDraft) -> Result<ApiResponse<LocalGroup>, ApiError> {
        self.put(&format!("local_groups/{}/", id), draft).await
    }

    pub async fn delete_local_group(&self, id: i64) -> Result<ApiResponse<Value>, ApiError> {
        self.delete(&format!("local_groups/{}/", id)).await
    }

    pub async fn admin_actions(&self) -> Result<Vec<AdminAction>, ApiError> {
        self.get(ADMIN_ACTIONS).await
    }
}
