use super::account::AccountState;
use crate::GIT_COMMIT_HASH;
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    provider: String,
    store: String,
}

fn status(ok: bool) -> String {
    let status = if ok { "ok" } else { "error" };
    status.to_string()
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Provider and record store are healthy", body = [Health]),
        (status = 503, description = "Provider or record store is unhealthy", body = [Health])
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(method: Method, state: Extension<Arc<AccountState>>) -> impl IntoResponse {
    let provider = state.provider().health().await;
    if let Err(error) = &provider {
        error!("Provider health check failed: {}", error);
    }

    let store = state.store().health().await;
    if let Err(error) = &store {
        error!("Record store health check failed: {}", error);
    }

    let is_healthy = provider.is_ok() && store.is_ok();

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: status(provider.is_ok()),
        store: status(store.is_ok()),
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    if is_healthy {
        (StatusCode::OK, headers, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, headers, body)
    }
}
