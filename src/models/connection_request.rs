use serde::Serialize;

use crate::types::ContactMethod;

/// Outbound message to an expert. Write-only; `preferred_contact_method`
/// is always serialized, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionRequest {
    pub expert_id: i64,
    pub message: String,
    pub preferred_contact_method: Option<ContactMethod>,
}
