use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 10;

/// Provider connection settings shared by the identity and document clients.
#[derive(Clone)]
pub struct GlobalArgs {
    pub provider_endpoint: String,
    pub provider_project_id: String,
    pub provider_api_key: SecretString,
    pub provider_timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(endpoint: String, project_id: String) -> Self {
        Self {
            provider_endpoint: endpoint,
            provider_project_id: project_id,
            provider_api_key: SecretString::default(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        }
    }

    pub fn set_api_key(&mut self, api_key: SecretString) {
        self.provider_api_key = api_key;
    }

    pub fn set_timeout_seconds(&mut self, seconds: u64) {
        self.provider_timeout = Duration::from_secs(seconds);
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("provider_endpoint", &self.provider_endpoint)
            .field("provider_project_id", &self.provider_project_id)
            .field("provider_api_key", &"***")
            .field("provider_timeout", &self.provider_timeout)
            .finish()
    }
}
