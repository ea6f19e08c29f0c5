//! Chirpy Server – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use anyhow::Result;
use chirpy_server::{config::ServerConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("CHIRPY_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let mut config = ServerConfig::laden(&config_pfad)?;
    config.env_ueberschreiben()?;

    chirpy_observability::logging_initialisieren(&config.logging.level, &config.logging.format);

    config.validieren()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Chirpy Server wird initialisiert"
    );

    Server::neu(config).starten().await
}
