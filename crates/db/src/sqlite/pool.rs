//! SQLite-Pool fuer Chirpy
//!
//! Jede Verbindung laeuft mit `foreign_keys = ON`, sonst greift das
//! kaskadierende Loeschen von Chirps und Refresh-Tokens nicht.

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::error::DbError;
use crate::repository::DatabaseConfig;

static MIGRATIONEN: Migrator = sqlx::migrate!("./migrations");

/// Wrapper um den SQLite Connection Pool
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Oeffnet (oder erstellt) die Datenbankdatei und migriert das Schema
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        let journal = if config.sqlite_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        let opts = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(journal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_verbindungen)
            .connect_with(opts)
            .await?;
        info!(url = %config.url, wal = config.sqlite_wal, "SQLite-Pool geoeffnet");

        Self::migriert(pool).await
    }

    /// In-Memory-Datenbank mit genau einer Verbindung
    ///
    /// Jede Verbindung auf `sqlite::memory:` sieht eine eigene Datenbank, der
    /// Pool darf deshalb nie mehr als eine halten oder sie schliessen.
    pub async fn in_memory() -> Result<Self, DbError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        Self::migriert(pool).await
    }

    async fn migriert(pool: SqlitePool) -> Result<Self, DbError> {
        let db = Self { pool };
        db.migrationen_ausfuehren().await?;
        Ok(db)
    }

    /// Fuehrt alle ausstehenden Migrationen aus
    pub async fn migrationen_ausfuehren(&self) -> Result<(), DbError> {
        MIGRATIONEN.run(&self.pool).await?;
        let stand = MIGRATIONEN.iter().map(|m| m.version).max().unwrap_or_default();
        info!(
            anzahl = MIGRATIONEN.iter().count(),
            version = stand,
            "Datenbank-Migrationen abgeschlossen"
        );
        Ok(())
    }
}
