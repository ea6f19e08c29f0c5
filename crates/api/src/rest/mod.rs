//! REST-Interface fuer Chirpy

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chirpy_auth::{AuthService, AutorisierungsWaechter};
use chirpy_chat::ChirpService;
use chirpy_db::SqliteDb;
use chirpy_observability::ChirpyMetrics;

use crate::error::ApiResult;

/// Auth-Service mit SQLite fuer Benutzer und Refresh-Tokens
pub type ChirpyAuthService = AuthService<SqliteDb, SqliteDb>;

/// Betriebsart; nur `dev` erlaubt den Admin-Reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plattform {
    Dev,
    #[default]
    Prod,
}

impl Plattform {
    pub fn ist_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

impl std::str::FromStr for Plattform {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(format!("Unbekannte Plattform: {other}")),
        }
    }
}

/// Axum-State fuer den REST-Server
///
/// Alles darin ist nach dem Start unveraenderlich oder intern synchronisiert.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<ChirpyAuthService>,
    pub chirps: Arc<ChirpService<SqliteDb>>,
    pub waechter: AutorisierungsWaechter,
    pub metriken: ChirpyMetrics,
    pub plattform: Plattform,
    /// Erwarteter API-Key des Zahlungsanbieters
    pub polka_key: Arc<str>,
}

impl AppState {
    pub fn neu(
        auth: Arc<ChirpyAuthService>,
        chirps: Arc<ChirpService<SqliteDb>>,
        metriken: ChirpyMetrics,
        plattform: Plattform,
        polka_key: &str,
    ) -> Self {
        let waechter = AutorisierungsWaechter::neu(Arc::clone(auth.access_tokens()));
        Self {
            auth,
            chirps,
            waechter,
            metriken,
            plattform,
            polka_key: Arc::from(polka_key),
        }
    }

    /// Handelnde Identitaet aus dem Bearer-Access-Token
    pub fn identitaet(&self, headers: &HeaderMap) -> ApiResult<Uuid> {
        Ok(self.waechter.identitaet(headers)?)
    }
}

pub use server::RestServer;
