//! Datenbankmodelle fuer Chirpy
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den API-Typen getrennt und dienen als reine Datenuebertragungsobjekte.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Einheitliches Zeitformat fuer alle TEXT-Zeitstempel
///
/// Feste Mikrosekunden und `Z`-Suffix, damit die lexikografische Sortierung
/// in SQLite der chronologischen entspricht.
pub fn zeit_formatieren(zeit: DateTime<Utc>) -> String {
    zeit.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Kuerzt auf die gespeicherte Genauigkeit (Mikrosekunden)
pub fn zeit_kuerzen(zeit: DateTime<Utc>) -> DateTime<Utc> {
    zeit.trunc_subsecs(6)
}

/// Aktuelle Zeit in gespeicherter Genauigkeit
pub fn jetzt() -> DateTime<Utc> {
    zeit_kuerzen(Utc::now())
}

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Daten zum Aktualisieren eines Benutzers
#[derive(Debug, Clone, Default)]
pub struct BenutzerUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

// ---------------------------------------------------------------------------
// Chirps
// ---------------------------------------------------------------------------

/// Chirp-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpRecord {
    pub id: Uuid,
    pub body: String,
    /// Verfasser, wird nur bei der Erstellung gesetzt
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Chirps
#[derive(Debug, Clone)]
pub struct NeuerChirp<'a> {
    pub body: &'a str,
    pub user_id: Uuid,
}

/// Sortierreihenfolge nach Erstellungszeitpunkt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sortierung {
    #[default]
    Asc,
    Desc,
}

impl Sortierung {
    pub fn als_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for Sortierung {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unbekannte Sortierung: {other}")),
        }
    }
}

/// Filter fuer die Chirp-Liste
#[derive(Debug, Clone, Default)]
pub struct ChirpFilter {
    /// Nur Chirps dieses Verfassers
    pub author_id: Option<Uuid>,
    pub sortierung: Sortierung,
}

// ---------------------------------------------------------------------------
// Refresh-Tokens
// ---------------------------------------------------------------------------

/// Refresh-Token-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// None = aktiv
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Daten zum Speichern eines neuen Refresh-Tokens
#[derive(Debug, Clone)]
pub struct NeuerRefreshToken<'a> {
    pub token: &'a str,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Ergebnis eines Widerrufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiderrufErgebnis {
    /// Token war aktiv und ist jetzt widerrufen
    Widerrufen,
    /// Token war bereits widerrufen, nichts geaendert
    BereitsWiderrufen,
    /// Token existiert nicht
    NichtGefunden,
}
