//! Temporary credentials for freshly created provider identities.

use rand::{rngs::OsRng, Rng};
use secrecy::{ExposeSecret, SecretString};

/// Characters a temporary credential is drawn from.
pub const CREDENTIAL_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

pub const CREDENTIAL_LENGTH: usize = 16;

/// A generated password the provider identity is created with.
///
/// It is only shown to the user when the verification email could not be sent.
#[derive(Clone)]
pub struct TemporaryCredential(SecretString);

impl TemporaryCredential {
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// Draw each character uniformly from [`CREDENTIAL_ALPHABET`].
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value: String = (0..CREDENTIAL_LENGTH)
            .map(|_| char::from(CREDENTIAL_ALPHABET[rng.gen_range(0..CREDENTIAL_ALPHABET.len())]))
            .collect();
        Self(SecretString::from(value))
    }

    #[must_use]
    pub fn as_secret(&self) -> &SecretString {
        &self.0
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for TemporaryCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TemporaryCredential(***)")
    }
}
