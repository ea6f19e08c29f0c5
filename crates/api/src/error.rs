//! Fehlertypen fuer die REST-API
//!
//! Fachliche Fehler aus `chirpy-auth` und `chirpy-chat` behalten ihren
//! Statuscode. Interne Fehler werden geloggt und ohne Details beantwortet.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use chirpy_auth::AuthError;
use chirpy_chat::ChatError;

use crate::rest::middleware::fehler_antwort;

/// Alle moeglichen Fehler der REST-Schicht
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Ungueltige Anfrage: {0}")]
    UngueltigeAnfrage(String),

    #[error("Verboten: {0}")]
    Verboten(String),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn http_status(&self) -> StatusCode {
        let code = match self {
            Self::Auth(e) => e.http_status(),
            Self::Chat(e) => e.http_status(),
            Self::UngueltigeAnfrage(_) => 400,
            Self::Verboten(_) => 403,
            Self::Intern(_) => 500,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::UngueltigeAnfrage(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::UngueltigeAnfrage(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::UngueltigeAnfrage(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(fehler = %self, "Anfrage mit internem Fehler beendet");
            return fehler_antwort(status, "Interner Serverfehler");
        }
        fehler_antwort(status, &self.to_string())
    }
}
