use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Industry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndustryDraft {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalGroup {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "group_number")]
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalGroupDraft {
    pub name: String,
    pub number: String,
}

impl From<&Industry> for IndustryDraft {
    fn from(industry: &Industry) -> Self {
        Self { name: industry.name.clone(), description: industry.description.clone() }
    }
}

impl From<&LocalGroup> for LocalGroupDraft {
    fn from(group: &LocalGroup) -> Self {
        Self { name: group.name.clone(), number: group.number.clone() }
    }
}
