pub mod guard;
pub mod navigator;
pub mod session;
pub mod token_store;

pub use guard::{guard, GuardOutcome};
pub use navigator::{Navigator, RecordingNavigator};
pub use session::{Session, SessionStore};
pub use token_store::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The subset of access-token claims the client cares about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl AccessClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at().map(|at| at <= Utc::now()).unwrap_or(false)
    }
}

#[derive(Debug)]
pub enum JwtError {
    Malformed(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Malformed(msg) => write!(f, "Malformed access token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// Read claims from an access token without verifying it. The backend is
/// the only party that can verify; this is for display and expiry hints.
pub fn decode_access_claims(token: &str) -> Result<AccessClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::Malformed(e.to_string()))
}

/// Short stable identifier for a token, safe to log
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let hash_str = format!("{:x}", hasher.finalize());
    hash_str[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn decodes_claims_without_secret() {
        let claims = AccessClaims { user_id: Some(17), exp: Some(4_102_444_800) };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-only")).unwrap();

        let decoded = decode_access_claims(&token).unwrap();
        assert_eq!(decoded.user_id, Some(17));
        assert!(!decoded.is_expired());
        assert_eq!(decoded.expires_at().unwrap().timestamp(), 4_102_444_800);
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(decode_access_claims("not-a-jwt").is_err());
    }

    #[test]
    fn fingerprints_are_stable_and_short() {
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
        assert_eq!(fingerprint("abc").len(), 12);
    }
}
