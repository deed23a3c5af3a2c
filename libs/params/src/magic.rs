//! Action magic handshake
//!
//! Requester and responder must agree on the magic string before any
//! request is served. Mismatches carry a short diagnosis for the logs.

use tracing::warn;

use crate::error::{ParamError, Result};

/// Exact comparison of a received magic against the expected one
pub fn verify_magic(expected: &str, received: &str) -> Result<()> {
    if expected == received {
        return Ok(());
    }

    let diagnosis = if received.is_empty() {
        "requester sent no magic"
    } else if received.trim() == expected {
        "surrounding whitespace"
    } else if received.eq_ignore_ascii_case(expected) {
        "case mismatch"
    } else {
        "different action contract or misconfigured peer"
    };

    warn!(expected, received, diagnosis, "Rejecting action request");

    Err(ParamError::MagicMismatch {
        expected: expected.to_string(),
        received: received.to_string(),
        diagnosis,
    })
}
