//! ChirpService – Chirps erstellen, laden, auflisten, loeschen

use std::sync::Arc;

use uuid::Uuid;

use chirpy_auth::{eigentum_pruefen, AuthError};
use chirpy_db::{models::NeuerChirp, ChirpRepository};

use crate::{
    error::{ChatError, ChatResult},
    moderation::zensieren,
    types::{Chirp, ChirpAbfrage},
};

/// Maximale Chirp-Laenge in Bytes (UTF-8)
pub const MAX_CHIRP_LAENGE: usize = 140;

/// ChirpService verwaltet Chirps
pub struct ChirpService<R: ChirpRepository> {
    repo: Arc<R>,
}

impl<R: ChirpRepository> ChirpService<R> {
    /// Erstellt einen neuen ChirpService
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self { repo })
    }

    /// Laengenpruefung, danach Moderation
    ///
    /// Gibt den bereinigten Text zurueck. Ein zu langer Text wird abgelehnt
    /// bevor die Moderation laeuft.
    pub fn pruefen(&self, body: &str) -> ChatResult<String> {
        if body.len() > MAX_CHIRP_LAENGE {
            return Err(ChatError::ZuLang {
                laenge: body.len(),
                max: MAX_CHIRP_LAENGE,
            });
        }
        Ok(zensieren(body))
    }

    /// Erstellt einen Chirp fuer die authentifizierte Identitaet
    ///
    /// Der Verfasser ist immer `identitaet`, nie ein Wert aus dem Request.
    pub async fn erstellen(&self, identitaet: Uuid, body: &str) -> ChatResult<Chirp> {
        let bereinigt = self.pruefen(body)?;

        let record = self
            .repo
            .create(NeuerChirp {
                body: &bereinigt,
                user_id: identitaet,
            })
            .await?;

        tracing::debug!(chirp_id = %record.id, user_id = %identitaet, "Chirp erstellt");
        Ok(record.into())
    }

    pub async fn laden(&self, id: Uuid) -> ChatResult<Chirp> {
        self.repo
            .get_by_id(id)
            .await?
            .map(Chirp::from)
            .ok_or_else(|| ChatError::NichtGefunden(id.to_string()))
    }

    /// Chirps nach Erstellungszeitpunkt, optional nach Verfasser gefiltert
    pub async fn auflisten(&self, abfrage: ChirpAbfrage) -> ChatResult<Vec<Chirp>> {
        let records = self.repo.list(abfrage.into()).await?;
        Ok(records.into_iter().map(Chirp::from).collect())
    }

    /// Loescht einen Chirp (nur der Verfasser)
    ///
    /// Existenz wird vor dem Eigentum geprueft.
    pub async fn loeschen(&self, identitaet: Uuid, id: Uuid) -> ChatResult<()> {
        let record = self.repo.get_by_id(id).await?;
        eigentum_pruefen(identitaet, record.as_ref(), "Chirp").map_err(|e| match e {
            AuthError::RessourceNichtGefunden(_) => ChatError::NichtGefunden(id.to_string()),
            andere => ChatError::Auth(andere),
        })?;

        // Parallel geloescht
        if !self.repo.delete(id).await? {
            return Err(ChatError::NichtGefunden(id.to_string()));
        }

        tracing::debug!(chirp_id = %id, user_id = %identitaet, "Chirp geloescht");
        Ok(())
    }
}
