use serde::{Deserialize, Serialize};

/// Hard cap on expertise records per expert
pub const MAX_EXPERTISE_RECORDS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expertise {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub expert: Option<i64>,
    // Present in directory listings only
    #[serde(default)]
    pub area_of_expertise: Option<String>,
    #[serde(default)]
    pub what_offering: String,
    #[serde(default)]
    pub who_would_benefit: String,
    #[serde(default)]
    pub why_choose_you: String,
    #[serde(default)]
    pub skills_not_offered: String,
}

/// Editable copy of an expertise record. `id` is `None` until the
/// record has been created on the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpertiseDraft {
    #[serde(skip_serializing)]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expert: Option<i64>,
    pub what_offering: String,
    pub who_would_benefit: String,
    pub why_choose_you: String,
    pub skills_not_offered: String,
}

impl ExpertiseDraft {
    pub fn is_blank(&self) -> bool {
        [&self.what_offering, &self.who_would_benefit, &self.why_choose_you, &self.skills_not_offered]
            .iter()
            .all(|s| s.trim().is_empty())
    }
}

impl From<&Expertise> for ExpertiseDraft {
    fn from(record: &Expertise) -> Self {
        Self {
            id: record.id,
            expert: record.expert,
            what_offering: record.what_offering.clone(),
            who_would_benefit: record.who_would_benefit.clone(),
            why_choose_you: record.why_choose_you.clone(),
            skills_not_offered: record.skills_not_offered.clone(),
        }
    }
}
