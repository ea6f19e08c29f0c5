//! # chirpy-observability
//!
//! Observability-Crate fuer Chirpy:
//! - Prometheus-kompatible Metriken (`/metrics`), inklusive Fileserver-Zaehler
//! - Structured Logging via tracing-subscriber (text oder JSON)
//! - Request-Timing und -Zaehlung als Axum-Middleware

pub mod logging;
pub mod metrics;
pub mod middleware;

pub use logging::logging_initialisieren;
pub use metrics::{metrics_router, ChirpyMetrics};
pub use middleware::{fileserver_hits_middleware, metriken_middleware, request_timing_layer};
