use super::{
    AccountId, NewUserRecord, TemporaryCredential, UserStore, DEFAULT_DISPLAY_NAME,
};
use crate::provider::{IdentityProvider, ProviderError};
use std::{sync::Arc, time::SystemTime};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use ulid::Ulid;
use url::Url;

pub const DEFAULT_AVATAR_URL: &str = "https://cloud.appwrite.io/v1/storage/buckets/64f6c0b8f4c5c8c8c8c8/files/64f6c0b8f4c5c8c8c8c8/view?project=64f6c0b8f4c5c8c8c8c8&mode=admin";

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to create account")]
    AccountCreationFailed,
}

#[derive(Clone, Debug)]
pub struct AccountConfig {
    verification_url: Url,
    avatar_url: String,
}

impl AccountConfig {
    /// Verification links point at `<public_url>/account/verify`.
    #[must_use]
    pub fn new(public_url: &Url) -> Self {
        let mut verification_url = public_url.clone();
        let base = public_url.path().trim_end_matches('/');
        verification_url.set_path(&format!("{base}/account/verify"));
        verification_url.set_query(None);
        verification_url.set_fragment(None);

        Self {
            verification_url,
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: String) -> Self {
        self.avatar_url = avatar_url;
        self
    }

    #[must_use]
    pub fn verification_url(&self) -> &Url {
        &self.verification_url
    }

    #[must_use]
    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }
}

#[derive(Clone, Debug)]
pub enum ReconcileOutcome {
    /// A new provider identity and user record were created. The credential is
    /// only present when the verification email could not be triggered.
    Created {
        account_id: AccountId,
        temporary_credential: Option<TemporaryCredential>,
    },
    /// A user record already existed; nothing was created.
    Existing { account_id: AccountId },
    /// The provider already knew the email but we had no record. A record with
    /// a provisional account id was created.
    Recovered {
        account_id: AccountId,
        verification_sent: bool,
    },
}

impl ReconcileOutcome {
    #[must_use]
    pub fn account_id(&self) -> &AccountId {
        match self {
            Self::Created { account_id, .. }
            | Self::Existing { account_id }
            | Self::Recovered { account_id, .. } => account_id,
        }
    }

    #[must_use]
    pub fn temporary_credential(&self) -> Option<&TemporaryCredential> {
        match self {
            Self::Created {
                temporary_credential,
                ..
            } => temporary_credential.as_ref(),
            Self::Existing { .. } | Self::Recovered { .. } => None,
        }
    }

    #[must_use]
    pub fn verification_sent(&self) -> bool {
        match self {
            Self::Created {
                temporary_credential,
                ..
            } => temporary_credential.is_none(),
            Self::Existing { .. } => false,
            Self::Recovered {
                verification_sent, ..
            } => *verification_sent,
        }
    }
}

#[derive(Clone)]
pub struct Reconciler {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn UserStore>,
    config: AccountConfig,
}

impl Reconciler {
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn UserStore>,
        config: AccountConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// Look up or create the account for `email`.
    ///
    /// # Errors
    /// Every failure other than a duplicate identity at the provider is logged
    /// and reported as [`ReconcileError::AccountCreationFailed`].
    #[instrument(skip(self, full_name))]
    pub async fn reconcile(
        &self,
        email: &str,
        full_name: &str,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let existing = self.store.find_by_email(email).await.map_err(|err| {
            error!("Failed to look up user record: {err}");
            ReconcileError::AccountCreationFailed
        })?;

        if let Some(record) = existing {
            info!("User record exists, returning existing account id");
            return Ok(ReconcileOutcome::Existing {
                account_id: AccountId::from(record.account_id),
            });
        }

        let outcome = self.provision(email, full_name).await?;

        if let ReconcileOutcome::Recovered { .. } = outcome {
            info!("Identity exists at the provider without a user record, creating record");
        }

        let record = NewUserRecord {
            full_name: full_name.to_string(),
            email: email.to_string(),
            avatar: self.config.avatar_url.clone(),
            account_id: outcome.account_id().to_string(),
        };

        self.store.create(record).await.map_err(|err| {
            error!(
                account_id = %outcome.account_id(),
                "Failed to persist user record: {err}"
            );
            ReconcileError::AccountCreationFailed
        })?;

        Ok(outcome)
    }

    /// Create the provider identity and trigger the verification email.
    async fn provision(
        &self,
        email: &str,
        full_name: &str,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let credential = TemporaryCredential::generate();
        let identity_id = Ulid::new().to_string();
        let display_name = if full_name.trim().is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            full_name.trim()
        };

        match self
            .provider
            .create_identity(&identity_id, email, credential.as_secret(), display_name)
            .await
        {
            Ok(identity) => {
                info!(identity_id = %identity.id, "Provider identity created");

                let temporary_credential = match self.send_verification().await {
                    Ok(()) => None,
                    Err(err) => {
                        warn!("Verification email failed, returning temporary credential: {err}");
                        Some(credential)
                    }
                };

                Ok(ReconcileOutcome::Created {
                    account_id: AccountId::from(identity.id),
                    temporary_credential,
                })
            }
            Err(ProviderError::AlreadyExists) => {
                info!("Provider identity already exists, sending verification email");

                let verification_sent = match self.send_verification().await {
                    Ok(()) => true,
                    Err(err) => {
                        warn!("Could not send verification email to existing identity: {err}");
                        false
                    }
                };

                Ok(ReconcileOutcome::Recovered {
                    account_id: AccountId::provisional(SystemTime::now()),
                    verification_sent,
                })
            }
            Err(err) => {
                error!("Failed to create provider identity: {err}");
                Err(ReconcileError::AccountCreationFailed)
            }
        }
    }

    async fn send_verification(&self) -> Result<(), ProviderError> {
        self.provider
            .create_verification(&self.config.verification_url)
            .await
    }
}
