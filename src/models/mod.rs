pub mod admin_action;
pub mod auth;
pub mod connection_request;
pub mod expert;
pub mod expertise;
pub mod reference;
pub mod user;

pub use admin_action::AdminAction;
pub use auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
pub use connection_request::ConnectionRequest;
pub use expert::{DirectoryExpert, Expert, ExpertUpdate};
pub use expertise::{Expertise, ExpertiseDraft, MAX_EXPERTISE_RECORDS};
pub use reference::{Industry, IndustryDraft, LocalGroup, LocalGroupDraft};
pub use user::{User, UserUpdate};
