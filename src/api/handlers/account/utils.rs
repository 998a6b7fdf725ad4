//! Server-side form validation.

use regex::Regex;

pub(super) const FULL_NAME_MIN_CHARS: usize = 2;
pub(super) const FULL_NAME_MAX_CHARS: usize = 50;

/// Strip surrounding whitespace. Case is kept: record lookups match the
/// email exactly as it was first stored.
pub(super) fn trim_email(email: &str) -> &str {
    email.trim()
}

/// Basic email format check on trimmed input.
pub(super) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Sign-up names are 2 to 50 characters once trimmed.
pub(super) fn valid_full_name(full_name: &str) -> bool {
    let chars = full_name.trim().chars().count();
    (FULL_NAME_MIN_CHARS..=FULL_NAME_MAX_CHARS).contains(&chars)
}
