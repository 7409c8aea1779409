//! Subscription handshake.
//!
//! When the webhook is registered, the provider issues
//! `GET ?hub.mode=subscribe&hub.verify_token=<secret>&hub.challenge=<nonce>`
//! and expects the nonce echoed back only if the token matches.

use super::signature::constant_time_compare;

/// Outcome of a verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Echo the challenge back.
    Verified { challenge: String },
    /// Refuse the subscription.
    Forbidden,
}

/// Checks a verification request against the configured token.
///
/// The mode must be exactly `subscribe`, and the token must match in
/// constant time. A missing challenge echoes back as an empty body.
pub fn verify_subscription(
    mode: Option<&str>,
    token: Option<&str>,
    challenge: Option<&str>,
    expected_token: &str,
) -> VerificationOutcome {
    let token_matches = token
        .map(|t| constant_time_compare(t.as_bytes(), expected_token.as_bytes()))
        .unwrap_or(false);

    if mode == Some("subscribe") && token_matches {
        VerificationOutcome::Verified {
            challenge: challenge.unwrap_or_default().to_string(),
        }
    } else {
        VerificationOutcome::Forbidden
    }
}
