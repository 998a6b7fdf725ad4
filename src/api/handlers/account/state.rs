use crate::{
    account::{Reconciler, UserStore},
    provider::IdentityProvider,
};
use std::sync::Arc;

/// Shared state for the account handlers.
#[derive(Clone)]
pub struct AccountState {
    reconciler: Reconciler,
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn UserStore>,
}

impl AccountState {
    #[must_use]
    pub fn new(
        reconciler: Reconciler,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            reconciler,
            provider,
            store,
        }
    }

    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    #[must_use]
    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }
}
