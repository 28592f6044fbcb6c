//! Session token codec
//!
//! Produces and verifies compact HMAC-SHA256 tokens in the JWT wire
//! format: `base64url(header).base64url(claims).base64url(signature)`.
//! The header embeds the algorithm identifier; verification rejects any
//! token whose header names a different algorithm, so a key can never be
//! tricked into validating a token signed under another scheme.
//!
//! Verification fails closed and reports failure as a value:
//! [`TokenCodec::verify`] returns `None` for a bad signature, unexpected
//! algorithm, malformed input, or an expired token. Callers treat "no
//! session" and "invalid session" identically, so there is nothing to
//! distinguish at this boundary.

use chrono::{DateTime, Duration, Utc};
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Default validity window for a freshly signed token, in seconds (1 day).
///
/// This is the authoritative cryptographic bound; any expiry hint inside
/// the payload is advisory only.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// The only algorithm this codec signs or accepts.
const ALGORITHM: &str = "HS256";

/// Signed token header.
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

impl Header {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated admin email
    pub sub: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

impl Claims {
    /// Expiry as a timestamp, for mirroring into the cookie.
    pub fn expires(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// HMAC-SHA256 session token codec.
///
/// Holds the symmetric server secret; cloning shares the key material.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("TokenCodec").field("ttl", &self.ttl).finish()
    }
}

impl TokenCodec {
    /// Create a codec from the server secret with the default 1-day TTL.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    /// Create a codec with a custom validity window.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl,
        }
    }

    /// Mint a token for the given admin identity.
    ///
    /// Issued-at is now; expiry is now + the codec's TTL, independent of
    /// anything the caller might want to embed.
    pub fn issue(&self, email: &str) -> (String, Claims) {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        (self.sign(&claims), claims)
    }

    /// Sign claims into a compact token string.
    pub fn sign(&self, claims: &Claims) -> String {
        // serde_json can only fail on non-string map keys or a failing
        // writer; neither applies to these fixed struct shapes.
        let header = serde_json::to_vec(&Header::hs256()).unwrap_or_default();
        let payload = serde_json::to_vec(claims).unwrap_or_default();

        let signing_input = format!(
            "{}.{}",
            BASE64URL_NOPAD.encode(&header),
            BASE64URL_NOPAD.encode(&payload),
        );
        let signature = self.mac(signing_input.as_bytes());
        format!("{}.{}", signing_input, BASE64URL_NOPAD.encode(&signature))
    }

    /// Verify a token and return its claims.
    ///
    /// `None` on any failure: wrong segment count, undecodable parts, an
    /// algorithm other than HS256, a signature mismatch, or an expiry in
    /// the past.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut parts = token.split('.');
        let header_b64 = parts.next()?;
        let payload_b64 = parts.next()?;
        let signature_b64 = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        let header_bytes = BASE64URL_NOPAD.decode(header_b64.as_bytes()).ok()?;
        let header: Header = serde_json::from_slice(&header_bytes).ok()?;
        if header.alg != ALGORITHM {
            return None;
        }

        let signature = BASE64URL_NOPAD.decode(signature_b64.as_bytes()).ok()?;
        let signing_input = format!("{header_b64}.{payload_b64}");
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(signing_input.as_bytes());
        // Constant-time comparison via the hmac crate.
        mac.verify_slice(&signature).ok()?;

        let payload_bytes = BASE64URL_NOPAD.decode(payload_b64.as_bytes()).ok()?;
        let claims: Claims = serde_json::from_slice(&payload_bytes).ok()?;
        if claims.exp <= Utc::now().timestamp() {
            return None;
        }
        Some(claims)
    }

    fn mac(&self, input: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(input);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a-test-secret-that-is-long-enough-to-be-real";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET)
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let codec = codec();
        let (token, claims) = codec.issue("admin@weekendexpress.dev");

        let verified = codec.verify(&token).expect("fresh token must verify");
        assert_eq!(verified, claims);
        assert_eq!(verified.sub, "admin@weekendexpress.dev");
    }

    #[test]
    fn test_expired_token_returns_none() {
        let codec = codec();
        let now = Utc::now();
        let claims = Claims {
            sub: "admin@weekendexpress.dev".to_string(),
            iat: (now - Duration::days(2)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = codec.sign(&claims);
        assert!(codec.verify(&token).is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = codec().issue("admin@weekendexpress.dev");
        let other = TokenCodec::new("a-completely-different-secret-value");
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let codec = codec();
        assert!(codec.verify("").is_none());
        assert!(codec.verify("not-a-token").is_none());
        assert!(codec.verify("a.b").is_none());
        assert!(codec.verify("a.b.c.d").is_none());
        assert!(codec.verify("!!!.???.###").is_none());
    }

    #[test]
    fn test_unexpected_algorithm_rejected() {
        let codec = codec();
        let (token, _) = codec.issue("admin@weekendexpress.dev");
        let parts: Vec<&str> = token.split('.').collect();

        // Re-sign the same claims under a header that names "none"; the
        // signature is valid for the body, but the algorithm check must
        // reject it before the expiry is even looked at.
        let forged_header =
            BASE64URL_NOPAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let signing_input = format!("{}.{}", forged_header, parts[1]);
        let forged_sig = BASE64URL_NOPAD.encode(&codec.mac(signing_input.as_bytes()));
        let forged = format!("{}.{}", signing_input, forged_sig);
        assert!(codec.verify(&forged).is_none());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let codec = codec();
        let (token, _) = codec.issue("admin@weekendexpress.dev");
        let dot = token.rfind('.').unwrap();
        let (head, sig) = token.split_at(dot + 1);

        let mut sig_bytes = BASE64URL_NOPAD.decode(sig.as_bytes()).unwrap();
        for i in 0..sig_bytes.len() {
            sig_bytes[i] ^= 0x01;
            let tampered = format!("{head}{}", BASE64URL_NOPAD.encode(&sig_bytes));
            assert!(
                codec.verify(&tampered).is_none(),
                "tampering byte {i} must break verification"
            );
            sig_bytes[i] ^= 0x01;
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let (token, _) = codec.issue("admin@weekendexpress.dev");
        let parts: Vec<&str> = token.split('.').collect();

        let other_claims = Claims {
            sub: "intruder@example.com".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
        };
        let forged_payload =
            BASE64URL_NOPAD.encode(&serde_json::to_vec(&other_claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert!(codec.verify(&forged).is_none());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(30))]

            /// Every issued token verifies under the issuing codec and
            /// yields the identity it was minted for.
            #[test]
            fn issued_tokens_always_roundtrip(email in "[a-z]{1,12}@[a-z]{1,10}\\.[a-z]{2,4}") {
                let codec = TokenCodec::new(SECRET);
                let (token, _) = codec.issue(&email);
                let claims = codec.verify(&token);
                prop_assert_eq!(claims.map(|c| c.sub), Some(email));
            }

            /// Arbitrary strings never verify.
            #[test]
            fn garbage_never_verifies(junk in "\\PC{0,80}") {
                let codec = TokenCodec::new(SECRET);
                prop_assert!(codec.verify(&junk).is_none());
            }

            /// Flipping any single signature byte breaks verification.
            #[test]
            fn single_byte_tamper_breaks_signature(byte_index in 0usize..32) {
                let codec = TokenCodec::new(SECRET);
                let (token, _) = codec.issue("admin@weekendexpress.dev");
                let dot = token.rfind('.').unwrap();
                let (head, sig) = token.split_at(dot + 1);
                let mut sig_bytes = BASE64URL_NOPAD.decode(sig.as_bytes()).unwrap();
                let i = byte_index % sig_bytes.len();
                sig_bytes[i] ^= 0xff;
                let tampered = format!("{head}{}", BASE64URL_NOPAD.encode(&sig_bytes));
                prop_assert!(codec.verify(&tampered).is_none());
            }
        }
    }
}
