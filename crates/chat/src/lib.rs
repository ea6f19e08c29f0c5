//! chirpy-chat – Chirps und Inhaltsmoderation
//!
//! Dieses Crate implementiert:
//! - Moderation: Ersetzen verbotener Woerter vor dem Speichern
//! - ChirpService: Chirps erstellen, laden, auflisten, loeschen
//!
//! # Beispiel
//!
//! ```no_run
//! use std::sync::Arc;
//! use chirpy_chat::ChirpService;
//! use chirpy_db::SqliteDb;
//!
//! #[tokio::main]
//! async fn main() {
//!     let db = Arc::new(SqliteDb::in_memory().await.unwrap());
//!     let chirps = ChirpService::neu(db);
//!     assert_eq!(chirps.pruefen("I hear Mastodon is better").unwrap(), "I hear Mastodon is better");
//! }
//! ```

pub mod error;
pub mod moderation;
pub mod service;
pub mod types;


// Bequeme Re-Exporte
pub use error::{ChatError, ChatResult};
pub use moderation::{zensieren, VERBOTENE_WOERTER};
pub use service::{ChirpService, MAX_CHIRP_LAENGE};
pub use types::{Chirp, ChirpAbfrage};
