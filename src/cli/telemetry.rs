//! Log output and optional OTLP span export.
//!
//! Spans are exported over gRPC only when `OTEL_EXPORTER_OTLP_ENDPOINT` is set;
//! otherwise logging goes to stdout alone.

use anyhow::Result;
use once_cell::sync::OnceCell;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::{Compression, SpanExporter, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    propagation::{BaggagePropagator, TraceContextPropagator},
    trace::{SdkTracerProvider, Tracer},
    Resource,
};
use std::{env::var, time::Duration};
use tonic::transport::ClientTlsConfig;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use ulid::Ulid;

const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

/// Collector endpoints without a scheme are reached over TLS.
fn collector_endpoint(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw.trim_end_matches('/'))
    }
}

/// Host to verify the collector certificate against, for https endpoints.
fn tls_domain(endpoint: &str) -> Option<&str> {
    endpoint
        .strip_prefix("https://")
        .and_then(|rest| rest.split('/').next())
        .and_then(|authority| authority.split(':').next())
        .filter(|host| !host.is_empty())
}

fn tracer(endpoint: &str) -> Result<Tracer> {
    let mut builder = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_compression(Compression::Gzip)
        .with_timeout(EXPORT_TIMEOUT);

    if let Some(domain) = tls_domain(endpoint) {
        builder = builder.with_tls_config(
            ClientTlsConfig::new()
                .domain_name(domain.to_string())
                .with_native_roots(),
        );
    }

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(builder.build()?)
        .with_resource(
            Resource::builder_empty()
                .with_attributes(vec![
                    KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                    KeyValue::new("service.instance.id", Ulid::new().to_string()),
                ])
                .build(),
        )
        .build();

    let _ = TRACER_PROVIDER.set(provider.clone());

    global::set_tracer_provider(provider.clone());
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));

    Ok(provider.tracer(env!("CARGO_PKG_NAME")))
}

/// `RUST_LOG` wins over the verbosity flag; noisy dependencies stay quiet.
fn filter(level: Level) -> Result<EnvFilter> {
    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("tokio=error".parse()?)
        .add_directive("sqlx=warn".parse()?)
        .add_directive("opentelemetry_sdk=warn".parse()?))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the exporter or subscriber cannot be set up
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .pretty();
    let filter = filter(verbosity_level.unwrap_or(Level::ERROR))?;
    let registry = Registry::default().with(fmt_layer);

    match var(OTLP_ENDPOINT_ENV) {
        Ok(raw) => {
            let tracer = tracer(&collector_endpoint(&raw))?;
            let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
            tracing::subscriber::set_global_default(registry.with(otel_layer).with(filter))?;
        }
        Err(_) => tracing::subscriber::set_global_default(registry.with(filter))?,
    }

    Ok(())
}

/// Flush pending spans. No-op when export is disabled.
pub fn shutdown_tracer() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        debug!("shutting down tracer provider");
        let _ = provider.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_endpoint_defaults_to_https() {
        assert_eq!(
            collector_endpoint("http://collector:4317"),
            "http://collector:4317"
        );
        assert_eq!(
            collector_endpoint("collector:4317/"),
            "https://collector:4317"
        );
    }

    #[test]
    fn tls_domain_only_for_https() {
        assert_eq!(
            tls_domain("https://otel.accord.dev:4317/v1"),
            Some("otel.accord.dev")
        );
        assert_eq!(tls_domain("http://localhost:4317"), None);
        assert_eq!(tls_domain("https://"), None);
    }

    #[test]
    fn filter_accepts_every_level() {
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            assert!(filter(level).is_ok());
        }
    }
}
