//! Account provider integration.
//!
//! The provider is an Appwrite-compatible backend-as-a-service exposing an
//! account API (identities and email verification) and a document database.
//! [`IdentityProvider`] is the seam the reconciliation procedure depends on;
//! [`ProviderClient`] implements it over HTTP and [`DocumentUserStore`] keeps
//! local user records in a provider collection.

pub mod client;
pub mod documents;

pub use client::ProviderClient;
pub use documents::DocumentUserStore;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::Value;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity already exists")]
    AlreadyExists,
    #[error("provider rejected request: {status} {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Build an error from a non-success response body.
    ///
    /// Appwrite error bodies look like `{"message": "...", "code": 409, "type": "..."}`.
    #[must_use]
    pub fn rejected(status: StatusCode, body: &Value) -> Self {
        Self::Rejected {
            status,
            message: error_message(body).to_string(),
        }
    }

    /// Whether the provider refused the request itself, as opposed to being
    /// unreachable, throttling, or failing internally.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::AlreadyExists => true,
            Self::Rejected { status, .. } => {
                status.is_client_error()
                    && *status != StatusCode::REQUEST_TIMEOUT
                    && *status != StatusCode::TOO_MANY_REQUESTS
            }
            Self::Transport(_) | Self::InvalidResponse(_) => false,
        }
    }
}

fn error_message(body: &Value) -> &str {
    body.get("message").and_then(Value::as_str).unwrap_or("")
}

/// A provider-side identity as returned on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an identity. Fails with [`ProviderError::AlreadyExists`] when the
    /// provider already holds an identity for `email`.
    async fn create_identity(
        &self,
        identity_id: &str,
        email: &str,
        secret: &SecretString,
        display_name: &str,
    ) -> Result<Identity, ProviderError>;

    /// Ask the provider to send a verification email linking to `redirect_url`.
    async fn create_verification(&self, redirect_url: &Url) -> Result<(), ProviderError>;

    /// Confirm a verification link the user followed.
    async fn confirm_verification(&self, user_id: &str, secret: &str)
        -> Result<(), ProviderError>;

    async fn health(&self) -> Result<(), ProviderError>;
}
