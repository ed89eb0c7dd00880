//! Credential encoding and verification.
//!
//! Earlier deployments of this service "hashed" the password with plain
//! base64 and compared encoded forms byte for byte. That scheme is
//! reversible and not secure; it is kept unchanged so existing password
//! files and database rows keep working. The same encoding doubles as
//! the partition key in the sqlite backend.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Outcome of checking a password against the stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// No credential has been set yet (first run).
    Unset,
    Valid,
    Invalid,
}

/// Encode a secret the way the store persists it.
pub fn encode_secret(secret: &str) -> String {
    STANDARD.encode(secret.as_bytes())
}

/// Compare a supplied secret against the stored encoded token.
pub fn check_secret(stored: Option<&str>, secret: &str) -> VerifyOutcome {
    match stored {
        None => VerifyOutcome::Unset,
        Some(token) if token == encode_secret(secret) => VerifyOutcome::Valid,
        Some(_) => VerifyOutcome::Invalid,
    }
}
