use serde::{Deserialize, Serialize};

use super::expertise::Expertise;
use crate::types::Availability;

/// Expert extension of a user account (`experts/me/`, `experts/by_user/:id/`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expert {
    pub id: i64,
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub industry: Option<i64>,
    #[serde(default)]
    pub industry_name: Option<String>,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub availability_status: Availability,
    #[serde(default)]
    pub show_contact_info: bool,
}

/// PATCH body for the expert tab; every field may be blank
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpertUpdate {
    pub occupation: String,
    pub industry: Option<i64>,
    pub background: String,
    pub availability_status: Availability,
    pub show_contact_info: bool,
}

impl From<&Expert> for ExpertUpdate {
    fn from(expert: &Expert) -> Self {
        Self {
            occupation: expert.occupation.clone(),
            industry: expert.industry,
            background: expert.background.clone(),
            availability_status: expert.availability_status,
            show_contact_info: expert.show_contact_info,
        }
    }
}

/// One row of the `users/experts/` directory listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryExpert {
    #[serde(alias = "id")]
    pub user_id: i64,
    #[serde(default)]
    pub expert_id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub local_group_name: Option<String>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub industry_name: Option<String>,
    #[serde(default)]
    pub availability_status: Availability,
    #[serde(default)]
    pub show_contact_info: bool,
    #[serde(default, alias = "expertises")]
    pub expertise: Vec<Expertise>,
}

impl DirectoryExpert {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}
