/// Request signing for the Meridian API.
///
/// The upstream scheme is a single keyed hash: the signature is the lowercase
/// hex SHA-256 of the concatenation `user_id + timestamp + secret`, carried in
/// three headers alongside every request. No nonce, no canonicalized method or
/// path; replay protection is upstream's timestamp check.

use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Authentication headers attached to every upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    /// X-User-ID value
    pub user_id: String,
    /// X-Timestamp value, unix seconds
    pub timestamp: String,
    /// X-Signature value, lowercase hex SHA-256
    pub signature: String,
}

/// Pure function of its inputs: identical arguments yield identical headers.
pub fn sign(user_id: &str, api_secret: &str, timestamp: u64) -> SignatureHeaders {
    let signed_str = format!("{user_id}{timestamp}{api_secret}");
    let mut hasher = Sha256::new();
    hasher.update(signed_str.as_bytes());
    let signature = hex::encode(hasher.finalize());

    SignatureHeaders {
        user_id: user_id.to_string(),
        timestamp: timestamp.to_string(),
        signature,
    }
}

/// Current unix time in seconds. A clock set before the epoch yields 0 and
/// upstream rejects the signature as stale.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_is_deterministic() {
        let a = sign("acct-42", "beefcafe", 1_700_000_000);
        let b = sign("acct-42", "beefcafe", 1_700_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn known_vector() {
        let headers = sign("acct-42", "beefcafe", 1_700_000_000);
        assert_eq!(headers.user_id, "acct-42");
        assert_eq!(headers.timestamp, "1700000000");
        assert_eq!(
            headers.signature,
            "584b6b6e03286e8d029d636dbea33bb4e4407f9027f6fefa43bc29a63b5e5bc8"
        );
    }

    #[test]
    fn signature_depends_on_every_input() {
        let base = sign("acct-42", "beefcafe", 1_700_000_000);
        assert_ne!(base, sign("acct-43", "beefcafe", 1_700_000_000));
        assert_ne!(base, sign("acct-42", "beefcaff", 1_700_000_000));
        assert_ne!(base, sign("acct-42", "beefcafe", 1_700_000_001));
    }

    #[test]
    fn signature_is_lowercase_hex() {
        let headers = sign("acct-42", "beefcafe", 1_700_000_000);
        assert_eq!(headers.signature.len(), 64);
        assert!(headers
            .signature
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
