//! In-memory stand-ins for the provider and the record store.
#![allow(clippy::unwrap_used)]

use super::{AccountConfig, NewUserRecord, StoreError, UserRecord, UserStore, DEFAULT_AVATAR_URL};
use crate::provider::{Identity, IdentityProvider, ProviderError};
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Mutex;
use url::Url;

#[derive(Clone, Copy, Debug)]
pub(crate) enum CreateBehavior {
    Succeed,
    AlreadyExists,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProviderCall {
    CreateIdentity {
        identity_id: String,
        email: String,
        display_name: String,
        secret: String,
    },
    CreateVerification(String),
    ConfirmVerification(String, String),
}

pub(crate) struct FakeProvider {
    create: CreateBehavior,
    verification_ok: bool,
    confirm: Option<StatusCode>,
    healthy: bool,
    pub(crate) calls: Mutex<Vec<ProviderCall>>,
}

impl FakeProvider {
    pub(crate) fn new(create: CreateBehavior, verification_ok: bool) -> Self {
        Self {
            create,
            verification_ok,
            confirm: None,
            healthy: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `confirm_verification` fail with the given provider status.
    pub(crate) fn with_confirm_failure(mut self, status: StatusCode) -> Self {
        self.confirm = Some(status);
        self
    }

    pub(crate) fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub(crate) fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn create_identity(
        &self,
        identity_id: &str,
        email: &str,
        secret: &SecretString,
        display_name: &str,
    ) -> Result<Identity, ProviderError> {
        self.calls.lock().unwrap().push(ProviderCall::CreateIdentity {
            identity_id: identity_id.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            secret: secret.expose_secret().to_string(),
        });
        match self.create {
            CreateBehavior::Succeed => Ok(Identity {
                id: identity_id.to_string(),
                email: email.to_string(),
                name: display_name.to_string(),
            }),
            CreateBehavior::AlreadyExists => Err(ProviderError::AlreadyExists),
            CreateBehavior::Fail => Err(ProviderError::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Server Error".to_string(),
            }),
        }
    }

    async fn create_verification(&self, redirect_url: &Url) -> Result<(), ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(ProviderCall::CreateVerification(redirect_url.to_string()));
        if self.verification_ok {
            Ok(())
        } else {
            Err(ProviderError::Rejected {
                status: StatusCode::UNAUTHORIZED,
                message: "missing scope (account)".to_string(),
            })
        }
    }

    async fn confirm_verification(
        &self,
        user_id: &str,
        secret: &str,
    ) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(ProviderCall::ConfirmVerification(
            user_id.to_string(),
            secret.to_string(),
        ));
        match self.confirm {
            None => Ok(()),
            Some(status) => Err(ProviderError::Rejected {
                status,
                message: "Invalid token passed in the request.".to_string(),
            }),
        }
    }

    async fn health(&self) -> Result<(), ProviderError> {
        if self.healthy {
            Ok(())
        } else {
            Err(ProviderError::Rejected {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "Service Unavailable".to_string(),
            })
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    pub(crate) records: Mutex<Vec<UserRecord>>,
    fail_find: bool,
    fail_create: bool,
}

impl FakeStore {
    pub(crate) fn with_record(email: &str, account_id: &str) -> Self {
        let store = Self::default();
        store.records.lock().unwrap().push(UserRecord {
            record_id: "rec-1".to_string(),
            full_name: "Existing User".to_string(),
            email: email.to_string(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
            account_id: account_id.to_string(),
        });
        store
    }

    pub(crate) fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub(crate) fn failing_find() -> Self {
        Self {
            fail_find: true,
            ..Self::default()
        }
    }

    pub(crate) fn records(&self) -> Vec<UserRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for FakeStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        if self.fail_find {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.email == email)
            .cloned())
    }

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, StoreError> {
        if self.fail_create {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|existing| existing.email == record.email) {
            return Err(StoreError::Conflict);
        }
        let created = UserRecord {
            record_id: format!("rec-{}", records.len() + 1),
            full_name: record.full_name,
            email: record.email,
            avatar: record.avatar,
            account_id: record.account_id,
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(crate) fn config() -> AccountConfig {
    AccountConfig::new(&Url::parse("http://localhost:3000").unwrap())
}
