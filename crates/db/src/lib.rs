//! chirpy-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern fuer Benutzer, Chirps und
//! Refresh-Tokens bereit. Die einzige Implementierung ist SQLite (sqlx),
//! die Services in `chirpy-auth` und `chirpy-chat` sind generisch ueber
//! die Traits und koennen in Tests mit eigenen Repositories laufen.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    ChirpRepository, DatabaseConfig, DbResult, RefreshTokenRepository, UserRepository,
};
pub use sqlite::SqliteDb;
