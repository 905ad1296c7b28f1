use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Successful backend response. Every method, PATCH included, yields this
/// same shape so callers can branch on status without a second code path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status: u16, data: T) -> Self {
        Self { status, data }
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse { status: self.status, data: f(self.data) }
    }

    /// 200 with a partial body is still success; 201 means something new exists
    pub fn is_created(&self) -> bool {
        self.status == 201
    }
}

impl ApiResponse<Value> {
    /// Decode the JSON payload into a concrete type
    pub fn decode<T: DeserializeOwned>(self) -> Result<ApiResponse<T>, ApiError> {
        let data = serde_json::from_value(self.data)?;
        Ok(ApiResponse { status: self.status, data })
    }

    /// True for the normalised "no JSON body" payload
    pub fn is_empty(&self) -> bool {
        matches!(&self.data, Value::Array(items) if items.is_empty())
    }
}
