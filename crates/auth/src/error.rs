//! Fehlertypen fuer den Auth-Service
//!
//! Jede Variante ist ein erwartetes Ergebnis von Benutzereingaben und hat eine
//! stabile HTTP-Kategorie ([`AuthError::http_status`]). Nichts davon wird intern
//! wiederholt.

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Authentifizierung ---
    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Keine Anmeldedaten uebermittelt")]
    AnmeldedatenFehlen,

    #[error("API-Key ungueltig")]
    NichtAutorisiert,

    // --- Access-Token ---
    #[error("Token fehlerhaft: {0}")]
    TokenFehlerhaft(String),

    #[error("Token-Signatur ungueltig")]
    SignaturUngueltig,

    #[error("Token abgelaufen")]
    TokenAbgelaufen,

    #[error("Token enthaelt kein gueltiges Subjekt")]
    SubjektFehlt,

    // --- Refresh-Token ---
    #[error("Refresh-Token nicht gefunden")]
    TokenNichtGefunden,

    #[error("Refresh-Token widerrufen")]
    TokenWiderrufen,

    // --- Autorisierung ---
    #[error("Zugriff verweigert: {0}")]
    ZugriffVerweigert(String),

    #[error("Nicht gefunden: {0}")]
    RessourceNichtGefunden(String),

    // --- Benutzerverwaltung ---
    #[error("E-Mail bereits registriert: {0}")]
    EmailVergeben(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] chirpy_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::RessourceNichtGefunden(msg.into())
    }

    /// HTTP-Statuscode der Fehlerkategorie
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UngueltigeEingabe(_) => 400,
            Self::UngueltigeAnmeldedaten
            | Self::AnmeldedatenFehlen
            | Self::NichtAutorisiert
            | Self::TokenFehlerhaft(_)
            | Self::SignaturUngueltig
            | Self::TokenAbgelaufen
            | Self::SubjektFehlt
            | Self::TokenNichtGefunden
            | Self::TokenWiderrufen => 401,
            Self::ZugriffVerweigert(_) => 403,
            Self::RessourceNichtGefunden(_) => 404,
            Self::EmailVergeben(_) => 409,
            Self::PasswortHashing(_) | Self::Datenbank(_) | Self::Intern(_) => 500,
        }
    }

    /// Gibt `true` zurueck wenn der Fehler intern ist und Details nicht nach aussen duerfen
    pub fn ist_intern(&self) -> bool {
        self.http_status() >= 500
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
