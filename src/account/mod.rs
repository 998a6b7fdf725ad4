//! Account reconciliation between local user records and provider identities.

pub mod credential;
mod reconcile;
pub mod store;
#[cfg(test)]
pub(crate) mod test_support;

pub use credential::TemporaryCredential;
pub use reconcile::{
    AccountConfig, ReconcileError, ReconcileOutcome, Reconciler, DEFAULT_AVATAR_URL,
};
pub use store::{NewUserRecord, PgUserStore, StoreError, UserRecord, UserStore};

use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix of account ids minted when the provider already holds an identity for
/// an email but its id is unknown to us.
pub const PROVISIONAL_ACCOUNT_PREFIX: &str = "existing_user_";

/// Display name sent to the provider when the caller gave none.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Foreign key from a user record into the provider identity space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Placeholder id for an identity that exists at the provider but whose
    /// real id we never learned. Tagged with the creation time in milliseconds.
    #[must_use]
    pub fn provisional(at: SystemTime) -> Self {
        let millis = at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self(format!("{PROVISIONAL_ACCOUNT_PREFIX}{millis}"))
    }

    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.0
            .strip_prefix(PROVISIONAL_ACCOUNT_PREFIX)
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn provisional_id_carries_millis() {
        let at = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let id = AccountId::provisional(at);
        assert_eq!(id.as_str(), "existing_user_1700000000123");
        assert!(id.is_provisional());
    }

    #[test]
    fn provider_ids_are_not_provisional() {
        assert!(!AccountId::from("01JAB3Z4X9".to_string()).is_provisional());
        assert!(!AccountId::from("existing_user_".to_string()).is_provisional());
        assert!(!AccountId::from("existing_user_abc".to_string()).is_provisional());
    }
}
