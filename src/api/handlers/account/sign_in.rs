use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::state::AccountState;
use super::types::{AccountResponse, SignInRequest};
use super::utils::{trim_email, valid_email};

/// Sign-in form submission. Runs the same reconciliation as sign-up, so an
/// unknown email still gets an account and a verification email.
#[utoipa::path(
    post,
    path = "/v1/account/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Account exists", body = AccountResponse),
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid email", body = String),
        (status = 500, description = "Account could not be created", body = String)
    ),
    tag = "account"
)]
#[instrument(skip_all)]
pub async fn sign_in(
    state: Extension<Arc<AccountState>>,
    payload: Option<Json<SignInRequest>>,
) -> impl IntoResponse {
    let request: SignInRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = trim_email(&request.email);
    if !valid_email(email) {
        debug!("Rejected sign-in with invalid email");
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    let full_name = request.full_name.as_deref().map_or("", str::trim);

    super::reconcile_response(&state, email, full_name).await
}
