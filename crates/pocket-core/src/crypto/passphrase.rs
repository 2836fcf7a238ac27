//! Passphrase validation.
//!
//! Runs before any cryptographic work or database access.

use crate::error::{PocketError, Result};

/// Minimum passphrase length in characters.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Maximum passphrase length in characters.
pub const MAX_PASSPHRASE_LENGTH: usize = 32;

/// Validate passphrase syntax.
///
/// # Requirements
///
/// - Between 8 and 32 characters long
/// - Only ASCII letters, digits, `-`, `_` and `!`
///
/// # Returns
///
/// Returns `Ok(())` if valid, or `PocketError::Validation` naming the problem.
///
/// # Examples
///
/// ```
/// use pocket_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("valid-Pass_1").is_ok());
/// assert!(validate_passphrase("short").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    let mut count = 0;
    for c in passphrase.chars() {
        count += 1;
        if !is_allowed(c) {
            return Err(PocketError::Validation(format!(
                "Passphrase contains illegal character '{}'; only letters, digits, '-', '_' and '!' are allowed",
                c
            )));
        }
    }

    if count < MIN_PASSPHRASE_LENGTH {
        return Err(PocketError::Validation(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH, count
        )));
    }

    if count > MAX_PASSPHRASE_LENGTH {
        return Err(PocketError::Validation(format!(
            "Passphrase must be at most {} characters (got {})",
            MAX_PASSPHRASE_LENGTH, count
        )));
    }

    Ok(())
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '!')
}
