//! chirpy-api – REST-Schnittstelle fuer Chirpy
//!
//! Dieses Crate implementiert:
//! - Axum-Router fuer Benutzer, Login/Tokens, Chirps, Admin und Webhooks
//! - Statischen Fileserver unter `/app/` mit Besuchszaehler
//! - Einheitliche JSON-Fehlerantworten (`{"error":{"code","message"}}`)

pub mod error;
pub mod rest;

pub use error::{ApiError, ApiResult};
pub use rest::{server::RestServer, server::RestServerKonfig, AppState, Plattform};
