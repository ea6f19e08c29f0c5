//! Prometheus-kompatible Metriken fuer Chirpy
//!
//! Registrierte Metriken:
//! - `fileserver_hits` – Counter: Anfragen an den statischen Fileserver (`/app/`)
//! - `http_requests_total` – Counter: HTTP-Anfragen (method, status)
//! - `http_request_duration_seconds` – Histogram: HTTP-Antwortzeit (method)
//!
//! Die Metriken sind ein injiziertes Objekt, kein globaler Zustand. Jede
//! Instanz hat ihre eigene Registry.

use anyhow::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Alle Chirpy-Prometheus-Metriken
#[derive(Clone)]
pub struct ChirpyMetrics {
    pub registry: Arc<Registry>,

    // Fileserver
    pub fileserver_hits: IntCounter,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl ChirpyMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        let fileserver_hits = IntCounter::with_opts(Opts::new(
            "fileserver_hits",
            "Anzahl Anfragen an den Fileserver",
        ))?;
        registry.register(Box::new(fileserver_hits.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ]),
            &["method"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            fileserver_hits,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    pub fn hit_zaehlen(&self) {
        self.fileserver_hits.inc();
    }

    pub fn hits(&self) -> u64 {
        self.fileserver_hits.get()
    }

    /// Setzt den Fileserver-Zaehler auf 0 (Admin-Reset)
    pub fn hits_zuruecksetzen(&self) {
        self.fileserver_hits.reset();
    }

    pub fn anfrage_zaehlen(&self, methode: &str, status: u16) {
        self.http_requests_total
            .with_label_values(&[methode, status.to_string().as_str()])
            .inc();
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: ChirpyMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<ChirpyMetrics>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
