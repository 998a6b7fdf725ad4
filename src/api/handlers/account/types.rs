//! Request/response types for account endpoints.

use crate::account::ReconcileOutcome;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub(crate) const CREATED_WITH_CREDENTIAL_MESSAGE: &str = "Account created! We could not send a verification email, use the temporary password included in this response to sign in.";
pub(crate) const CREATED_MESSAGE: &str =
    "Account created! Please check your email for verification link.";
pub(crate) const RECOVERED_MESSAGE: &str =
    "Account already exists! Please check your email for verification link or try signing in.";
pub(crate) const EXISTING_MESSAGE: &str = "Account already exists. Please sign in.";
pub(crate) const ACCOUNT_FAILED_MESSAGE: &str = "Failed to create account. Please try again later.";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub full_name: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Created,
    Existing,
    Recovered,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub status: AccountStatus,
    pub account_id: String,
    /// Only present when the verification email could not be sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_credential: Option<String>,
    pub verification_sent: bool,
    pub message: String,
}

impl From<&ReconcileOutcome> for AccountResponse {
    fn from(outcome: &ReconcileOutcome) -> Self {
        let temporary_credential = outcome
            .temporary_credential()
            .map(|credential| credential.expose_secret().to_string());

        let (status, message) = match outcome {
            ReconcileOutcome::Created { .. } if temporary_credential.is_some() => {
                (AccountStatus::Created, CREATED_WITH_CREDENTIAL_MESSAGE)
            }
            ReconcileOutcome::Created { .. } => (AccountStatus::Created, CREATED_MESSAGE),
            ReconcileOutcome::Existing { .. } => (AccountStatus::Existing, EXISTING_MESSAGE),
            ReconcileOutcome::Recovered { .. } => (AccountStatus::Recovered, RECOVERED_MESSAGE),
        };

        Self {
            status,
            account_id: outcome.account_id().to_string(),
            temporary_credential,
            verification_sent: outcome.verification_sent(),
            message: message.to_string(),
        }
    }
}

#[derive(IntoParams, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VerifyQuery {
    /// Provider identity id from the verification link.
    pub user_id: Option<String>,
    /// Verification secret from the verification link.
    pub secret: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationState {
    Success,
    InvalidLink,
    InProgress,
}

impl VerificationState {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Email verified successfully! You can now sign in to your account.",
            Self::InvalidLink => "Invalid verification link",
            Self::InProgress => "Verifying your email...",
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerificationResponse {
    pub state: VerificationState,
    pub message: String,
}

impl From<VerificationState> for VerificationResponse {
    fn from(state: VerificationState) -> Self {
        Self {
            state,
            message: state.message().to_string(),
        }
    }
}
