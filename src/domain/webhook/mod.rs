//! Messaging webhook rules: payload classification, signature checks and the
//! subscription handshake.

mod inbound;
mod signature;
mod verification;

pub use inbound::{IgnoreReason, InboundEvent, TextMessage};
pub use signature::{
    constant_time_compare, PayloadSignatureVerifier, SignatureError, SIGNATURE_HEADER,
};
pub use verification::{verify_subscription, VerificationOutcome};
