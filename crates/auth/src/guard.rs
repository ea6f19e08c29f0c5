//! Autorisierung mutierender Operationen
//!
//! Pruefreihenfolge fuer jede mutierende Anfrage:
//! 1. Anmeldedaten vorhanden
//! 2. Anmeldedaten gueltig (Access-Token)
//! 3. Zielressource existiert
//! 4. Identitaet ist Eigentuemer der Ressource
//!
//! Schritte 1 und 2 uebernimmt [`AutorisierungsWaechter::identitaet`],
//! Schritte 3 und 4 [`eigentum_pruefen`].

use std::sync::Arc;

use chirpy_db::models::{BenutzerRecord, ChirpRecord};
use http::HeaderMap;
use uuid::Uuid;

use crate::access_token::AccessTokenService;
use crate::credentials::bearer_token_extrahieren;
use crate::error::{AuthError, AuthResult};

/// Ressource mit einem festen Eigentuemer
pub trait Eigentum {
    fn eigentuemer(&self) -> Uuid;
}

impl Eigentum for ChirpRecord {
    fn eigentuemer(&self) -> Uuid {
        self.user_id
    }
}

impl Eigentum for BenutzerRecord {
    /// Ein Benutzer gehoert sich selbst
    fn eigentuemer(&self) -> Uuid {
        self.id
    }
}

/// Prueft ob die Identitaet der Eigentuemer ist
pub fn eigentuemer_pruefen(identitaet: Uuid, eigentuemer: Uuid) -> AuthResult<()> {
    if identitaet == eigentuemer {
        Ok(())
    } else {
        tracing::debug!(
            identitaet = %identitaet,
            eigentuemer = %eigentuemer,
            "Zugriff auf fremde Ressource verweigert"
        );
        Err(AuthError::ZugriffVerweigert(
            "Ressource gehoert einem anderen Benutzer".into(),
        ))
    }
}

/// Existenz vor Eigentum: eine fehlende Ressource ergibt immer 404
pub fn eigentum_pruefen<'a, R: Eigentum>(
    identitaet: Uuid,
    ressource: Option<&'a R>,
    art: &str,
) -> AuthResult<&'a R> {
    let ressource = ressource.ok_or_else(|| AuthError::nicht_gefunden(art))?;
    eigentuemer_pruefen(identitaet, ressource.eigentuemer())?;
    Ok(ressource)
}

/// Leitet die handelnde Identitaet aus einem Access-Token ab
#[derive(Clone)]
pub struct AutorisierungsWaechter {
    tokens: Arc<AccessTokenService>,
}

impl AutorisierungsWaechter {
    pub fn neu(tokens: Arc<AccessTokenService>) -> Self {
        Self { tokens }
    }

    /// Bearer-Token lesen und validieren
    pub fn identitaet(&self, headers: &HeaderMap) -> AuthResult<Uuid> {
        let token = bearer_token_extrahieren(headers)?;
        self.tokens.validieren(token)
    }
}
