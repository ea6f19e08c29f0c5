//! Auth-Service fuer Chirpy
//!
//! Zentraler Service fuer Registrierung, Login, Token-Erneuerung, Widerruf,
//! Benutzer-Update und Upgrade. Nutzt die DB-Repositories, den Passwort-Hasher,
//! den Access-Token-Service und den Refresh-Token-Store.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use chirpy_db::{
    models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer},
    DbError, RefreshTokenRepository, UserRepository,
};

use crate::{
    access_token::AccessTokenService,
    error::{AuthError, AuthResult},
    guard::eigentum_pruefen,
    password::PasswortHasher,
    refresh_token::RefreshTokenStore,
};

/// Ergebnis eines erfolgreichen Logins
#[derive(Debug, Clone)]
pub struct Anmeldung {
    pub benutzer: BenutzerRecord,
    pub access_token: String,
    pub refresh_token: String,
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<U: UserRepository, T: RefreshTokenRepository> {
    user_repo: Arc<U>,
    hasher: PasswortHasher,
    access_tokens: Arc<AccessTokenService>,
    refresh_tokens: RefreshTokenStore<T>,
    /// Vergleichswert fuer unbekannte E-Mails, damit jeder Login Argon2 ausfuehrt
    blindhash: Option<String>,
}

const BLINDPASSWORT: &str = "chirpy-blindwert";

fn eingabe_pruefen(email: &str, passwort: &str) -> AuthResult<()> {
    if email.trim().is_empty() {
        return Err(AuthError::UngueltigeEingabe("E-Mail fehlt".into()));
    }
    if passwort.is_empty() {
        return Err(AuthError::UngueltigeEingabe("Passwort fehlt".into()));
    }
    Ok(())
}

fn eindeutigkeit_abbilden(e: DbError, email: &str) -> AuthError {
    if e.ist_eindeutigkeit() {
        AuthError::EmailVergeben(email.to_string())
    } else {
        AuthError::Datenbank(e)
    }
}

impl<U: UserRepository, T: RefreshTokenRepository> AuthService<U, T> {
    pub fn neu(
        user_repo: Arc<U>,
        hasher: PasswortHasher,
        access_tokens: Arc<AccessTokenService>,
        refresh_tokens: RefreshTokenStore<T>,
    ) -> Self {
        let blindhash = match hasher.hashen(BLINDPASSWORT) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(fehler = %e, "Blind-Hash konnte nicht erzeugt werden");
                None
            }
        };
        Self {
            user_repo,
            hasher,
            access_tokens,
            refresh_tokens,
            blindhash,
        }
    }

    pub fn access_tokens(&self) -> &Arc<AccessTokenService> {
        &self.access_tokens
    }

    /// Registriert einen neuen Benutzer
    pub async fn registrieren(&self, email: &str, passwort: &str) -> AuthResult<BenutzerRecord> {
        eingabe_pruefen(email, passwort)?;

        if self.user_repo.get_by_email(email).await?.is_some() {
            return Err(AuthError::EmailVergeben(email.to_string()));
        }

        let passwort_hash = self.hasher.hashen(passwort)?;

        // UNIQUE-Constraint faengt parallele Registrierungen ab
        let benutzer = self
            .user_repo
            .create(NeuerBenutzer {
                email,
                password_hash: &passwort_hash,
            })
            .await
            .map_err(|e| eindeutigkeit_abbilden(e, email))?;

        tracing::info!(user_id = %benutzer.id, "Neuer Benutzer registriert");
        Ok(benutzer)
    }

    /// Meldet einen Benutzer an
    ///
    /// Stellt ein Access-Token (Lebensdauer `ttl`, begrenzt auf 1 Stunde) und
    /// einen neuen Refresh-Token aus. Fruehere Refresh-Tokens bleiben gueltig.
    pub async fn anmelden(
        &self,
        email: &str,
        passwort: &str,
        ttl: Option<Duration>,
    ) -> AuthResult<Anmeldung> {
        let Some(benutzer) = self.user_repo.get_by_email(email).await? else {
            // Gleiche Argon2-Kosten wie bei bekannter E-Mail
            if let Some(hash) = &self.blindhash {
                let _ = self.hasher.verifizieren(passwort, hash);
            }
            return Err(AuthError::UngueltigeAnmeldedaten);
        };

        if !self.hasher.verifizieren(passwort, &benutzer.password_hash)? {
            tracing::warn!(user_id = %benutzer.id, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        let access_token = self.access_tokens.ausstellen_mit_ttl(benutzer.id, ttl)?;
        let refresh_token = self.refresh_tokens.ausstellen(benutzer.id).await?;

        tracing::info!(user_id = %benutzer.id, "Benutzer angemeldet");

        Ok(Anmeldung {
            benutzer,
            access_token,
            refresh_token,
        })
    }

    /// Stellt mit einem gueltigen Refresh-Token ein neues Access-Token aus
    ///
    /// Keine Rotation: der Refresh-Token bleibt unveraendert gueltig.
    pub async fn access_token_erneuern(&self, refresh_token: &str) -> AuthResult<String> {
        let user_id = self.refresh_tokens.identitaet_aufloesen(refresh_token).await?;
        let token = self.access_tokens.ausstellen(user_id)?;
        tracing::debug!(user_id = %user_id, "Access-Token erneuert");
        Ok(token)
    }

    pub async fn refresh_token_widerrufen(&self, refresh_token: &str) -> AuthResult<()> {
        self.refresh_tokens.widerrufen(refresh_token).await
    }

    /// Aendert E-Mail und Passwort eines Benutzers
    ///
    /// Nur der Benutzer selbst darf sich aendern. Existenz wird vor dem
    /// Eigentum geprueft.
    pub async fn benutzer_aktualisieren(
        &self,
        identitaet: Uuid,
        ziel_id: Uuid,
        email: &str,
        passwort: &str,
    ) -> AuthResult<BenutzerRecord> {
        let ziel = self.user_repo.get_by_id(ziel_id).await?;
        eigentum_pruefen(identitaet, ziel.as_ref(), "Benutzer")?;

        eingabe_pruefen(email, passwort)?;
        let passwort_hash = self.hasher.hashen(passwort)?;

        let benutzer = self
            .user_repo
            .update(
                ziel_id,
                BenutzerUpdate {
                    email: Some(email.to_string()),
                    password_hash: Some(passwort_hash),
                },
            )
            .await
            .map_err(|e| match e {
                DbError::NichtGefunden(_) => AuthError::nicht_gefunden("Benutzer"),
                e => eindeutigkeit_abbilden(e, email),
            })?;

        tracing::info!(user_id = %benutzer.id, "Benutzer aktualisiert");
        Ok(benutzer)
    }

    /// Setzt das Chirpy-Red-Flag (Webhook des Zahlungsanbieters)
    pub async fn upgraden(&self, user_id: Uuid) -> AuthResult<BenutzerRecord> {
        let benutzer = self
            .user_repo
            .upgrade(user_id)
            .await?
            .ok_or_else(|| AuthError::nicht_gefunden("Benutzer"))?;

        tracing::info!(user_id = %user_id, "Benutzer auf Chirpy Red aktualisiert");
        Ok(benutzer)
    }

    /// Loescht alle Benutzer samt Chirps und Refresh-Tokens
    pub async fn alle_benutzer_loeschen(&self) -> AuthResult<u64> {
        let anzahl = self.user_repo.delete_all().await.map_err(|e| {
            tracing::error!(fehler = %e, "Benutzer konnten nicht geloescht werden");
            AuthError::Datenbank(e)
        })?;
        tracing::warn!(anzahl, "Alle Benutzer geloescht");
        Ok(anzahl)
    }
}
