//! Oeffentliche Typen fuer den Chirp-Service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chirpy_db::models::{ChirpFilter, ChirpRecord, Sortierung};

/// Ein Chirp (Domain-Typ, nicht DB-Record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<ChirpRecord> for Chirp {
    fn from(record: ChirpRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            body: record.body,
            user_id: record.user_id,
        }
    }
}

/// Abfrage fuer die Chirp-Liste
#[derive(Debug, Clone, Default)]
pub struct ChirpAbfrage {
    /// Nur Chirps dieses Verfassers
    pub author_id: Option<Uuid>,
    pub sortierung: Sortierung,
}

impl From<ChirpAbfrage> for ChirpFilter {
    fn from(abfrage: ChirpAbfrage) -> Self {
        Self {
            author_id: abfrage.author_id,
            sortierung: abfrage.sortierung,
        }
    }
}
