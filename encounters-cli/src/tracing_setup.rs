//! Tracing and OpenTelemetry setup for the encounters binary
//!
//! `Telemetry::init` installs the subscriber and hands back the handle that
//! owns the span exporter. The caller keeps it alive for the life of the
//! process and calls `shutdown` to flush. No global tracer provider is set.
//!
//! Usage:
//!   encounters --debug serve ...              # Debug logging to console
//!   encounters --otel serve ...               # Export spans to OTLP endpoint
//!   RUST_LOG=encounters_server=debug encounters serve
//!
//! Environment variables:
//!   RUST_LOG                          # Log filter (default: info)
//!   OTEL_EXPORTER_OTLP_ENDPOINT       # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                 # Service name (default: encounters-service)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (used when RUST_LOG is not set)
    pub debug: bool,
    /// Enable OpenTelemetry OTLP export
    pub otel: bool,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        let fallback = if self.debug { "debug" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Observability handle; owns the span exporter when one is running
pub struct Telemetry {
    #[cfg(feature = "telemetry")]
    provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

impl Telemetry {
    /// Initialize tracing based on configuration.
    ///
    /// Chooses between console-only and OTLP export based on `config.otel`.
    pub fn init(config: &TracingConfig) -> Result<Self> {
        #[cfg(feature = "telemetry")]
        {
            if config.otel {
                return Self::init_with_otel(config);
            }
        }

        #[cfg(not(feature = "telemetry"))]
        {
            if config.otel {
                eprintln!("warning: --otel ignored, built without the `telemetry` feature");
            }
        }

        Self::init_console(config)
    }

    /// Console output only
    fn init_console(config: &TracingConfig) -> Result<Self> {
        tracing_subscriber::fmt()
            .with_env_filter(config.filter())
            .with_target(config.debug)
            .compact()
            .try_init()
            .map_err(|err| anyhow!(err))?;

        Ok(Self {
            #[cfg(feature = "telemetry")]
            provider: None,
        })
    }

    #[cfg(feature = "telemetry")]
    fn init_with_otel(config: &TracingConfig) -> Result<Self> {
        use opentelemetry::trace::TracerProvider as _;
        use opentelemetry::KeyValue;
        use opentelemetry_otlp::WithExportConfig;
        use opentelemetry_sdk::trace::TracerProvider;
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4317".to_string());

        let service_name = std::env::var("OTEL_SERVICE_NAME")
            .unwrap_or_else(|_| "encounters-service".to_string());

        let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&endpoint)
            .build()
            .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

        let resource = opentelemetry_sdk::Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]);

        let provider = TracerProvider::builder()
            .with_batch_exporter(otlp_exporter, opentelemetry_sdk::runtime::Tokio)
            .with_resource(resource)
            .build();

        let tracer = provider.tracer("encounters-service");
        let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(config.debug)
            .compact();

        tracing_subscriber::registry()
            .with(config.filter())
            .with(fmt_layer)
            .with(telemetry_layer)
            .try_init()
            .map_err(|err| anyhow!(err))?;

        tracing::info!(
            endpoint = %endpoint,
            service = %service_name,
            "OpenTelemetry tracing initialized"
        );

        Ok(Self {
            provider: Some(provider),
        })
    }

    /// Whether spans leave the process
    #[cfg(feature = "telemetry")]
    pub fn exporting(&self) -> bool {
        self.provider.is_some()
    }

    #[cfg(not(feature = "telemetry"))]
    pub fn exporting(&self) -> bool {
        false
    }

    /// Flush pending spans and stop the exporter.
    pub fn shutdown(self) {
        #[cfg(feature = "telemetry")]
        {
            if let Some(provider) = self.provider {
                if let Err(e) = provider.shutdown() {
                    eprintln!("Error shutting down tracer provider: {e}");
                }
            }
        }
    }
}
