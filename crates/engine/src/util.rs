//! Internal helpers for input validation and credentials.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and normalization so the engine enforces consistent invariants.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

const MIN_PASSWORD_LEN: usize = 8;
const MIN_PERSON_NAME_LEN: usize = 2;
const MAX_PERSON_NAME_LEN: usize = 255;

/// Canonical form of an email address: trimmed, NFKC, lowercase.
pub(crate) fn normalize_email(value: &str) -> String {
    value.trim().nfkc().collect::<String>().to_lowercase()
}

/// Validate an already normalized email address.
///
/// Only the shape is checked: a non-empty local part, a single `@` and a
/// dotted domain without empty labels.
pub(crate) fn validate_email(email: &str) -> ResultEngine<()> {
    let invalid = || EngineError::InvalidCredentials("please enter a valid email address".into());

    if email.is_empty() {
        return Err(EngineError::InvalidCredentials(
            "email is required".to_string(),
        ));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// Password rules: at least 8 characters with a lowercase letter, an
/// uppercase letter and a digit.
pub(crate) fn validate_password(password: &str) -> ResultEngine<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(EngineError::InvalidCredentials(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let has_lower = password.chars().any(char::is_lowercase);
    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(EngineError::InvalidCredentials(
            "password must contain at least one uppercase letter, one lowercase letter, and one number"
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate and trim a first/last name.
pub(crate) fn normalize_person_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if !(MIN_PERSON_NAME_LEN..=MAX_PERSON_NAME_LEN).contains(&len) {
        return Err(EngineError::InvalidName(format!(
            "{label} must be between {MIN_PERSON_NAME_LEN} and {MAX_PERSON_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn hash_password(password: &str, cost: u32) -> ResultEngine<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a candidate password against a stored bcrypt hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> ResultEngine<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

/// 32 random bytes, URL-safe base64 encoded.
pub(crate) fn new_session_token() -> String {
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    URL_SAFE_NO_PAD.encode(bytes)
}
