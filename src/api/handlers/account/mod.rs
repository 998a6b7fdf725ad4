//! Sign-up, sign-in and email verification endpoints.
//!
//! Sign-up and sign-in both run account reconciliation: an existing user
//! record is returned as is, otherwise a provider identity and a record are
//! created and a verification email is requested. Verification links land on
//! `GET /account/verify`, which confirms them with the provider.

pub(crate) mod sign_in;
pub(crate) mod sign_up;
mod state;
pub(crate) mod types;
mod utils;
pub(crate) mod verification;

pub use state::AccountState;


use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use types::{AccountResponse, ACCOUNT_FAILED_MESSAGE};

/// Run reconciliation and map the outcome to the HTTP response shared by
/// sign-up and sign-in.
async fn reconcile_response(state: &AccountState, email: &str, full_name: &str) -> Response {
    match state.reconciler().reconcile(email, full_name).await {
        Ok(outcome) => {
            let status = if matches!(outcome, crate::account::ReconcileOutcome::Created { .. }) {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(AccountResponse::from(&outcome))).into_response()
        }
        // Already logged with context by the reconciler.
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ACCOUNT_FAILED_MESSAGE.to_string(),
        )
            .into_response(),
    }
}
