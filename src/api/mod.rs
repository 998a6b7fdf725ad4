use crate::{
    api::handlers::{account::AccountState, health, root},
    cli::telemetry,
};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    routing::{get, options},
    Extension, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
mod openapi;

pub use openapi::openapi;

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Assemble the full application: documented routes, Swagger UI, the
/// undocumented `/` and `OPTIONS /health` routes, and the middleware stack.
///
/// # Errors
/// Returns an error if the CORS origin cannot be derived from `app_url`.
pub fn app(app_url: &Url, state: Arc<AccountState>) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::exact(frontend_origin(app_url)?));

    let (router, openapi) = router().split_for_parts();

    Ok(router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi))
        .route("/", get(root::root))
        .route("/health", options(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state)),
        ))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, app_url: &Url, state: Arc<AccountState>) -> Result<()> {
    let app = app(app_url, state)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry::shutdown_tracer();
    info!("Gracefully shutdown");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn frontend_origin(app_url: &Url) -> Result<HeaderValue> {
    let host = app_url
        .host_str()
        .ok_or_else(|| anyhow!("Application URL must include a valid host: {app_url}"))?;
    let port = app_url
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", app_url.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::account::test_support::{config, CreateBehavior, FakeProvider, FakeStore};
    use crate::account::Reconciler;
    use axum::{body::to_bytes, http::StatusCode};
    use tower::ServiceExt;

    fn state() -> Arc<AccountState> {
        let provider = Arc::new(FakeProvider::new(CreateBehavior::Succeed, true));
        let store = Arc::new(FakeStore::default());
        let reconciler = Reconciler::new(provider.clone(), store.clone(), config());
        Arc::new(AccountState::new(reconciler, provider, store))
    }

    #[test]
    fn frontend_origin_drops_path() {
        let url = Url::parse("https://app.tld:8443/portal/").unwrap();
        assert_eq!(
            frontend_origin(&url).unwrap(),
            HeaderValue::from_static("https://app.tld:8443")
        );
        let url = Url::parse("http://localhost:3000").unwrap();
        assert_eq!(
            frontend_origin(&url).unwrap(),
            HeaderValue::from_static("http://localhost:3000")
        );
    }

    #[tokio::test]
    async fn request_id_is_generated_and_propagated() -> anyhow::Result<()> {
        let app = app(&Url::parse("http://localhost:3000")?, state())?;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(Ulid::from_string(&request_id).is_ok());

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert!(String::from_utf8(body.to_vec())?.starts_with(env!("CARGO_PKG_NAME")));
        Ok(())
    }

    #[tokio::test]
    async fn cors_allows_app_origin() -> anyhow::Result<()> {
        let app = app(&Url::parse("https://app.tld")?, state())?;
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/v1/account/sign-up")
                    .header("Origin", "https://app.tld")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("https://app.tld")
        );
        Ok(())
    }

    #[tokio::test]
    async fn serves_openapi_document() -> anyhow::Result<()> {
        let app = app(&Url::parse("http://localhost:3000")?, state())?;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let payload: serde_json::Value = serde_json::from_slice(&body)?;
        assert!(payload["paths"].get("/v1/account/sign-up").is_some());
        Ok(())
    }
}
