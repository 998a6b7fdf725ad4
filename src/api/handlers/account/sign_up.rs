use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::state::AccountState;
use super::types::{AccountResponse, SignUpRequest};
use super::utils::{trim_email, valid_email, valid_full_name};

/// Create an account for a new user, or return the one already on record.
#[utoipa::path(
    post,
    path = "/v1/account/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 200, description = "Account already exists", body = AccountResponse),
        (status = 400, description = "Invalid email or name", body = String),
        (status = 500, description = "Account could not be created", body = String)
    ),
    tag = "account"
)]
#[instrument(skip_all)]
pub async fn sign_up(
    state: Extension<Arc<AccountState>>,
    payload: Option<Json<SignUpRequest>>,
) -> impl IntoResponse {
    let request: SignUpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = trim_email(&request.email);
    if !valid_email(email) {
        debug!("Rejected sign-up with invalid email");
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    if !valid_full_name(&request.full_name) {
        debug!("Rejected sign-up with invalid name");
        return (
            StatusCode::BAD_REQUEST,
            "Full name must be between 2 and 50 characters".to_string(),
        )
            .into_response();
    }

    super::reconcile_response(&state, email, request.full_name.trim()).await
}
