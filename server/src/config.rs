//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Deployment-Werte (Datenbank, Secrets, Plattform) koennen
//! ueber Umgebungsvariablen ueberschrieben werden.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use chirpy_api::Plattform;
use chirpy_auth::Argon2Parameter;
use chirpy_db::DatabaseConfig;

pub const ENV_DB_URL: &str = "DB_URL";
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_POLKA_KEY: &str = "POLKA_KEY";
pub const ENV_PLATTFORM: &str = "PLATFORM";

/// Obergrenze fuer `refresh_token_ttl_tage` (10 Jahre)
pub const MAX_REFRESH_TOKEN_TAGE: i64 = 3650;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Tokens, Secrets und Passwort-Hashing
    pub auth: AuthEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// `dev` erlaubt `/admin/reset`
    pub plattform: Plattform,
    /// Wurzelverzeichnis fuer `/app/`
    pub statisches_verzeichnis: PathBuf,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            plattform: Plattform::Prod,
            statisches_verzeichnis: PathBuf::from("."),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    pub bind_adresse: String,
    pub port: u16,
    /// CORS-Origins fuer REST (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let standard = DatabaseConfig::default();
        Self {
            url: standard.url,
            max_verbindungen: standard.max_verbindungen,
            sqlite_wal: standard.sqlite_wal,
        }
    }
}

impl DatenbankEinstellungen {
    pub fn als_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_verbindungen: self.max_verbindungen,
            sqlite_wal: self.sqlite_wal,
        }
    }
}

/// Auth-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// HMAC-Secret fuer Access-Tokens, darf nicht leer sein
    pub jwt_secret: String,
    /// API-Key des Zahlungsanbieters fuer `/api/polka/webhooks`
    pub polka_key: String,
    /// Standard-Lebensdauer der Access-Tokens (hoechstens 3600)
    pub access_token_ttl_sekunden: i64,
    pub refresh_token_ttl_tage: i64,
    pub argon2: Argon2Parameter,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            polka_key: String::new(),
            access_token_ttl_sekunden: 3600,
            refresh_token_ttl_tage: 60,
            argon2: Argon2Parameter::default(),
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Uebernimmt `DB_URL`, `JWT_SECRET`, `POLKA_KEY` und `PLATFORM` aus der Umgebung
    pub fn env_ueberschreiben(&mut self) -> anyhow::Result<()> {
        self.ueberschreiben_mit(|name| std::env::var(name).ok())
    }

    /// Wie [`Self::env_ueberschreiben`], mit beliebiger Quelle
    pub fn ueberschreiben_mit<F>(&mut self, quelle: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = quelle(ENV_DB_URL) {
            self.datenbank.url = url;
        }
        if let Some(secret) = quelle(ENV_JWT_SECRET) {
            self.auth.jwt_secret = secret;
        }
        if let Some(key) = quelle(ENV_POLKA_KEY) {
            self.auth.polka_key = key;
        }
        if let Some(plattform) = quelle(ENV_PLATTFORM) {
            self.server.plattform = plattform
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{ENV_PLATTFORM}: {e}"))?;
        }
        Ok(())
    }

    /// Prueft Werte, ohne die der Server nicht sinnvoll starten kann
    pub fn validieren(&self) -> anyhow::Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT-Secret fehlt ([auth] jwt_secret oder {ENV_JWT_SECRET})");
        }
        if self.auth.access_token_ttl_sekunden <= 0 {
            anyhow::bail!("access_token_ttl_sekunden muss positiv sein");
        }
        if !(1..=MAX_REFRESH_TOKEN_TAGE).contains(&self.auth.refresh_token_ttl_tage) {
            anyhow::bail!(
                "refresh_token_ttl_tage muss zwischen 1 und {MAX_REFRESH_TOKEN_TAGE} liegen"
            );
        }
        if self.auth.polka_key.is_empty() {
            tracing::warn!("Kein Polka-API-Key konfiguriert, Webhooks werden abgelehnt");
        }
        self.rest_bind_adresse()?;
        Ok(())
    }

    /// Gibt die Bind-Adresse fuer den REST-Server zurueck
    pub fn rest_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        let adresse = format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port);
        adresse
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{adresse}'"))
    }
}
