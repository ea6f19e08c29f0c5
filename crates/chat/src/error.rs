//! Fehlertypen fuer das Chat-Crate

use thiserror::Error;

/// Chat-Fehlertypen
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chirp zu lang: {laenge} Bytes (Maximum: {max})")]
    ZuLang { laenge: usize, max: usize },

    #[error("Chirp nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error(transparent)]
    Auth(#[from] chirpy_auth::AuthError),

    #[error("Datenbank-Fehler: {0}")]
    DatenbankFehler(#[from] chirpy_db::DbError),
}

impl ChatError {
    /// HTTP-Statuscode der Fehlerkategorie
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ZuLang { .. } => 400,
            Self::NichtGefunden(_) => 404,
            Self::Auth(e) => e.http_status(),
            Self::DatenbankFehler(_) => 500,
        }
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
