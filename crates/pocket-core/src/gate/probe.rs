//! Password probe formats.
//!
//! Two plaintext formats are accepted when a probe decrypts:
//!
//! - the literal `"PasswordTest"`, written by early versions
//! - exactly 13 ASCII digits, written by every later bootstrap

use crate::storage::schema::PROBE_DIGITS;

/// Probe plaintext written by early versions.
pub const LEGACY_PROBE: &str = "PasswordTest";

/// Recognised probe plaintext formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFormat {
    Legacy,
    Digits,
}

/// Classify a decrypted probe value.
///
/// Returns `None` when the value matches neither format.
pub fn probe_format(plaintext: &str) -> Option<ProbeFormat> {
    if plaintext == LEGACY_PROBE {
        return Some(ProbeFormat::Legacy);
    }

    if plaintext.len() == PROBE_DIGITS && plaintext.bytes().all(|b| b.is_ascii_digit()) {
        return Some(ProbeFormat::Digits);
    }

    None
}

pub fn is_valid_probe(plaintext: &str) -> bool {
    probe_format(plaintext).is_some()
}
