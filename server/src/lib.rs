//! chirpy-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Services und REST-Server und stellt den
//! oeffentlichen Einstiegspunkt fuer Integrationstests bereit.

pub mod config;

use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;

use chirpy_api::{AppState, RestServer, RestServerKonfig};
use chirpy_auth::{
    ttl_aus_sekunden, AccessTokenService, AuthService, PasswortHasher, RefreshTokenStore,
};
use chirpy_chat::ChirpService;
use chirpy_db::SqliteDb;
use chirpy_observability::ChirpyMetrics;
use config::ServerConfig;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Baut den Anwendungszustand auf einer bereits geoeffneten Datenbank
    pub fn state_bauen(&self, db: SqliteDb) -> Result<AppState> {
        let auth_cfg = &self.config.auth;
        let db = Arc::new(db);

        let access_tokens = Arc::new(AccessTokenService::neu(
            &auth_cfg.jwt_secret,
            ttl_aus_sekunden(auth_cfg.access_token_ttl_sekunden),
        )?);
        let refresh_laufzeit = Duration::try_days(auth_cfg.refresh_token_ttl_tage)
            .ok_or_else(|| anyhow::anyhow!("refresh_token_ttl_tage ausserhalb des Zeitbereichs"))?;
        let refresh_tokens = RefreshTokenStore::mit_laufzeit(Arc::clone(&db), refresh_laufzeit);
        let auth = Arc::new(AuthService::neu(
            Arc::clone(&db),
            PasswortHasher::neu(auth_cfg.argon2)?,
            access_tokens,
            refresh_tokens,
        ));
        let chirps = ChirpService::neu(db);
        let metriken = ChirpyMetrics::neu()?;

        Ok(AppState::neu(
            auth,
            chirps,
            metriken,
            self.config.server.plattform,
            &auth_cfg.polka_key,
        ))
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 2. Services und Metriken aufbauen
    /// 3. REST-Server starten
    /// 4. Auf Ctrl-C warten, laufende Anfragen abschliessen
    pub async fn starten(self) -> Result<()> {
        let bind_addr = self.config.rest_bind_adresse()?;
        tracing::info!(
            adresse = %bind_addr,
            plattform = ?self.config.server.plattform,
            "Server startet"
        );

        let db = SqliteDb::oeffnen(&self.config.datenbank.als_database_config()).await?;
        let state = self.state_bauen(db)?;

        let rest = RestServer::neu(RestServerKonfig {
            bind_addr,
            cors_origins: self.config.netzwerk.cors_origins.clone(),
            statisches_verzeichnis: self.config.server.statisches_verzeichnis.clone(),
        });

        rest.starten(state, shutdown_signal()).await?;
        tracing::info!("Server beendet");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown-Signal empfangen, Server wird beendet"),
        Err(e) => tracing::error!(fehler = %e, "Shutdown-Signal konnte nicht abonniert werden"),
    }
}
