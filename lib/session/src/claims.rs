//! Best-effort JWT claim inspection.
//!
//! The provider's id and access tokens are JWTs whose payload carries an
//! `exp` claim. Signature verification belongs to the provider; here the
//! payload is only decoded to answer "has this credential already lapsed?",
//! so an undecodable token is simply reported as having no readable expiry.

use base64::Engine;
use chrono::{DateTime, Utc};

/// Extracts the `exp` claim from a JWT, if the token is decodable.
///
/// A JWT is `base64url(header).base64url(payload).signature`; only the
/// payload is of interest. Returns `None` for opaque (non-JWT) tokens,
/// malformed segments, or payloads without a numeric `exp`.
#[must_use]
pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .ok()?;

    let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).ok()?;

    let exp = payload.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

/// Returns true if the token carries an `exp` claim that is already past.
///
/// Tokens without a readable expiry are treated as not-yet-expired; the
/// refresh buffer window remains the primary staleness control.
#[must_use]
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match expiry(token) {
        Some(exp) => exp <= now,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_segment(json: &str) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json)
    }

    fn jwt_with_exp(exp: i64) -> String {
        format!(
            "{}.{}.signature",
            encode_segment(r#"{"alg":"RS256","typ":"JWT"}"#),
            encode_segment(&format!(r#"{{"sub":"staff","exp":{exp}}}"#)),
        )
    }

    #[test]
    fn reads_exp_claim() {
        let token = jwt_with_exp(1_700_000_000);
        let exp = expiry(&token).expect("decodable exp");
        assert_eq!(exp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn opaque_token_has_no_expiry() {
        assert_eq!(expiry("ya29.opaque-access-token"), None);
    }

    #[test]
    fn malformed_payload_has_no_expiry() {
        assert_eq!(expiry("aGVhZGVy.!!!notbase64!!!.sig"), None);
    }

    #[test]
    fn payload_without_exp_has_no_expiry() {
        let token = format!(
            "{}.{}.sig",
            encode_segment("{}"),
            encode_segment(r#"{"sub":"staff"}"#),
        );
        assert_eq!(expiry(&token), None);
    }

    #[test]
    fn expired_and_live_tokens() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp");

        assert!(is_expired(&jwt_with_exp(1_699_999_999), now));
        assert!(is_expired(&jwt_with_exp(1_700_000_000), now));
        assert!(!is_expired(&jwt_with_exp(1_700_000_600), now));
    }

    #[test]
    fn undecodable_token_is_not_expired() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp");
        assert!(!is_expired("not-a-jwt", now));
    }
}
