//! Axum HTTP-Server fuer Chirpy

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use chirpy_observability::{
    fileserver_hits_middleware, metrics_router, metriken_middleware, request_timing_layer,
};

use crate::rest::{routes::api_router, AppState};

/// REST-Server-Konfiguration
#[derive(Debug, Clone)]
pub struct RestServerKonfig {
    pub bind_addr: SocketAddr,
    /// Erlaubte CORS-Origins. Leer = alle Origins erlaubt (nur fuer Entwicklung).
    pub cors_origins: Vec<String>,
    /// Wurzelverzeichnis des Fileservers unter `/app/`
    pub statisches_verzeichnis: PathBuf,
}

impl Default for RestServerKonfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origins: vec![],
            statisches_verzeichnis: PathBuf::from("."),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(tower_http::cors::Any)
}

/// Baut die vollstaendige Anwendung aus State und Konfiguration
///
/// - `/api/...`, `/admin/...`: REST-Handler
/// - `/app/...`: statische Dateien, jede Anfrage erhoeht `fileserver_hits`
/// - `/metrics`: Prometheus-Export
pub fn app_bauen(state: AppState, konfig: &RestServerKonfig) -> Router {
    let metriken = state.metriken.clone();

    let fileserver = Router::new()
        .nest_service("/app", ServeDir::new(&konfig.statisches_verzeichnis))
        .layer(from_fn_with_state(metriken.clone(), fileserver_hits_middleware));

    api_router()
        .with_state(state)
        .merge(fileserver)
        .merge(metrics_router(metriken.clone()))
        .layer(from_fn_with_state(metriken, metriken_middleware))
        .layer(request_timing_layer())
        .layer(cors_layer(&konfig.cors_origins))
}

/// Axum HTTP-Server fuer Chirpy
pub struct RestServer {
    konfig: RestServerKonfig,
}

impl RestServer {
    pub fn neu(konfig: RestServerKonfig) -> Self {
        Self { konfig }
    }

    /// Startet den REST-Server und laeuft bis `shutdown` aufgeloest wird
    pub async fn starten(
        self,
        state: AppState,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let app = app_bauen(state, &self.konfig);

        let listener = tokio::net::TcpListener::bind(self.konfig.bind_addr).await?;
        tracing::info!(
            addr = %self.konfig.bind_addr,
            statisch = %self.konfig.statisches_verzeichnis.display(),
            "REST-Server gestartet"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
