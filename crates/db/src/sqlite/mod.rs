//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod chirps;
pub mod pool;
pub mod refresh_tokens;
pub mod users;

pub use pool::SqliteDb;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::DbResult;

pub(crate) fn uuid_parsen(wert: &str) -> DbResult<Uuid> {
    Uuid::parse_str(wert).map_err(|e| DbError::intern(format!("Ungueltige UUID '{wert}': {e}")))
}

pub(crate) fn zeit_parsen(feld: &str, wert: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(wert)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltiger Zeitstempel {feld} '{wert}': {e}")))
}
