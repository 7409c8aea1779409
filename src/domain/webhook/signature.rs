//! Webhook payload signature verification.
//!
//! The provider signs each POST body with HMAC-SHA256 keyed by the app secret
//! and sends it as `X-Hub-Signature-256: sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Errors from signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("missing signature header")]
    Missing,

    #[error("malformed signature header: {0}")]
    Malformed(String),

    #[error("signature mismatch")]
    Mismatch,
}

/// Verifier for provider webhook signatures.
pub struct PayloadSignatureVerifier {
    secret: Vec<u8>,
}

impl PayloadSignatureVerifier {
    /// Creates a new verifier with the given app secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Verifies the signature header against the raw body.
    ///
    /// # Errors
    ///
    /// - `Missing` - No header was supplied
    /// - `Malformed` - Header lacks the `sha256=` prefix or is not hex
    /// - `Mismatch` - Signature does not match the body
    pub fn verify(&self, payload: &[u8], header: Option<&str>) -> Result<(), SignatureError> {
        let header = header.ok_or(SignatureError::Missing)?;
        let hex_signature = header
            .trim()
            .strip_prefix(SIGNATURE_PREFIX)
            .ok_or_else(|| SignatureError::Malformed("missing sha256= prefix".to_string()))?;
        let provided = hex::decode(hex_signature)
            .map_err(|_| SignatureError::Malformed("invalid hex".to_string()))?;

        let expected = self.compute(payload);
        if !constant_time_compare(&expected, &provided) {
            return Err(SignatureError::Mismatch);
        }
        Ok(())
    }

    /// Produces the header value for a payload.
    pub fn sign(&self, payload: &[u8]) -> String {
        format!("{}{}", SIGNATURE_PREFIX, hex::encode(self.compute(payload)))
    }

    fn compute(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time byte comparison.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "app_secret_test";
    const BODY: &[u8] = br#"{"entry":[]}"#;

    #[test]
    fn accepts_valid_signature() {
        let verifier = PayloadSignatureVerifier::new(SECRET);
        let header = verifier.sign(BODY);
        assert!(verifier.verify(BODY, Some(&header)).is_ok());
    }

    #[test]
    fn rejects_tampered_body() {
        let verifier = PayloadSignatureVerifier::new(SECRET);
        let header = verifier.sign(BODY);
        assert_eq!(
            verifier.verify(br#"{"entry":[1]}"#, Some(&header)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let header = PayloadSignatureVerifier::new("other").sign(BODY);
        let verifier = PayloadSignatureVerifier::new(SECRET);
        assert_eq!(
            verifier.verify(BODY, Some(&header)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_missing_header() {
        let verifier = PayloadSignatureVerifier::new(SECRET);
        assert_eq!(verifier.verify(BODY, None), Err(SignatureError::Missing));
    }

    #[test]
    fn rejects_malformed_headers() {
        let verifier = PayloadSignatureVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify(BODY, Some("abcdef")),
            Err(SignatureError::Malformed(_))
        ));
        assert!(matches!(
            verifier.verify(BODY, Some("sha256=not-hex")),
            Err(SignatureError::Malformed(_))
        ));
    }

    #[test]
    fn constant_time_compare_handles_lengths() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abd"));
        assert!(!constant_time_compare(b"abc", b"abcd"));
    }
}
