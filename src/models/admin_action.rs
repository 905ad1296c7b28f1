use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit record of an administrative change. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAction {
    pub id: i64,
    #[serde(default, alias = "admin_username")]
    pub admin: Option<String>,
    #[serde(default, alias = "target_username")]
    pub target_user: Option<String>,
    pub action: String,
    pub created_at: DateTime<Utc>,
}
