//! REST-Handler Module

pub mod admin;
pub mod chirps;
pub mod tokens;
pub mod users;
pub mod webhooks;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use chirpy_db::models::BenutzerRecord;

/// Oeffentliche Benutzerdarstellung, ohne Passwort-Hash
#[derive(Debug, Serialize)]
pub struct BenutzerAntwort {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<BenutzerRecord> for BenutzerAntwort {
    fn from(record: BenutzerRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            email: record.email,
            is_chirpy_red: record.is_chirpy_red,
        }
    }
}
