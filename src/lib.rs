//! # Accord (account reconciliation & email verification)
//!
//! `accord` backs a sign-in/sign-up form and an email verification landing page
//! with a third-party account provider (an Appwrite-compatible REST API).
//!
//! ## Reconciliation
//!
//! A sign-up or sign-in request carries an email and an optional display name.
//! The service reconciles it against two systems it does not own:
//!
//! - **Local user records**, kept either in the provider's document store or in
//!   PostgreSQL. Email is the uniqueness key; the store must carry a unique index
//!   on it.
//! - **Provider identities**, created on the first attempt for an email. The
//!   provider rejects a second identity for the same email, which is the only
//!   guard against concurrent sign-ups racing past the local lookup.
//!
//! The outcome is one of `Created`, `Existing` or `Recovered` (the provider
//! already knows the email but no local record exists). Nothing here is
//! transactional: an identity created without a record is healed by the
//! `Recovered` branch on a later attempt.
//!
//! ## Verification
//!
//! Verification emails are sent by the provider and link back to
//! `<public-url>/account/verify?userId=..&secret=..`. The landing endpoint forwards
//! both parameters to the provider's confirmation endpoint.

pub mod account;
pub mod api;
pub mod cli;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with("accord/"));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
