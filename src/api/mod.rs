pub mod client;
pub mod endpoints;
pub mod response;

pub use client::{ApiClient, Body, PhotoUpload};
pub use endpoints::ProfileTarget;
pub use response::ApiResponse;

use url::Url;

use crate::error::ApiError;

/// Parse the configured API root, forcing a trailing slash so relative
/// endpoint paths join underneath it instead of replacing the last segment.
pub fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Ok(Url::parse(&with_slash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url("https://example.org/api").unwrap();
        assert_eq!(url.join("users/me/").unwrap().as_str(), "https://example.org/api/users/me/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(normalize_base_url("not a url").is_err());
    }
}
