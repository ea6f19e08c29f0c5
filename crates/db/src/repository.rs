//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Implementiert werden die Traits von
//! [`crate::SqliteDb`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{
    BenutzerRecord, BenutzerUpdate, ChirpFilter, ChirpRecord, NeuerBenutzer, NeuerChirp,
    NeuerRefreshToken, RefreshTokenRecord, WiderrufErgebnis,
};

/// Result-Alias fuer Datenbankoperationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://chirpy.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://chirpy.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Einen neuen Benutzer anlegen
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer anhand seiner ID laden
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seiner E-Mail laden (exakter Vergleich)
    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// E-Mail und/oder Passwort-Hash aendern
    async fn update(&self, id: Uuid, data: BenutzerUpdate) -> DbResult<BenutzerRecord>;

    /// Setzt das Chirpy-Red-Flag; `None` wenn der Benutzer nicht existiert
    async fn upgrade(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>>;

    /// Loescht alle Benutzer (nur Entwicklungsbetrieb), gibt die Anzahl zurueck
    async fn delete_all(&self) -> DbResult<u64>;
}

/// Repository fuer Chirp-Datenzugriffe
#[allow(async_fn_in_trait)]
pub trait ChirpRepository: Send + Sync {
    async fn create(&self, data: NeuerChirp<'_>) -> DbResult<ChirpRecord>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<ChirpRecord>>;

    /// Liste nach Erstellungszeitpunkt, optional nach Verfasser gefiltert
    async fn list(&self, filter: ChirpFilter) -> DbResult<Vec<ChirpRecord>>;

    /// Gibt `true` zurueck wenn ein Datensatz geloescht wurde
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
}

/// Repository fuer Refresh-Tokens
#[allow(async_fn_in_trait)]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, data: NeuerRefreshToken<'_>) -> DbResult<RefreshTokenRecord>;

    async fn get(&self, token: &str) -> DbResult<Option<RefreshTokenRecord>>;

    /// Setzt `revoked_at` atomar, falls das Token noch aktiv ist
    async fn revoke(&self, token: &str, zeitpunkt: DateTime<Utc>) -> DbResult<WiderrufErgebnis>;
}
