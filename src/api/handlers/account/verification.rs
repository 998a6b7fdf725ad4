//! Verification landing endpoint.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::state::AccountState;
use super::types::{VerificationResponse, VerificationState, VerifyQuery};

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Confirm the verification link the user followed from their email.
#[utoipa::path(
    get,
    path = "/account/verify",
    params(VerifyQuery),
    responses(
        (status = 200, description = "Email verified", body = VerificationResponse),
        (status = 400, description = "Missing parameters or link rejected", body = VerificationResponse),
        (status = 503, description = "Provider unavailable, retry later", body = VerificationResponse)
    ),
    tag = "account"
)]
#[instrument(skip_all)]
pub async fn verify(
    state: Extension<Arc<AccountState>>,
    query: Option<Query<VerifyQuery>>,
) -> impl IntoResponse {
    let query = query.map(|Query(query)| query).unwrap_or_default();

    let (Some(user_id), Some(secret)) = (
        non_blank(query.user_id.as_deref()),
        non_blank(query.secret.as_deref()),
    ) else {
        return respond(VerificationState::InvalidLink);
    };

    match state.provider().confirm_verification(user_id, secret).await {
        Ok(()) => {
            info!(user_id, "Email verified");
            respond(VerificationState::Success)
        }
        Err(err) if err.is_rejection() => {
            warn!(user_id, "Verification link rejected: {err}");
            respond(VerificationState::InvalidLink)
        }
        Err(err) => {
            error!(user_id, "Failed to confirm verification: {err}");
            respond(VerificationState::InProgress)
        }
    }
}

fn respond(state: VerificationState) -> axum::response::Response {
    let status = match state {
        VerificationState::Success => StatusCode::OK,
        VerificationState::InvalidLink => StatusCode::BAD_REQUEST,
        VerificationState::InProgress => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(VerificationResponse::from(state))).into_response()
}
