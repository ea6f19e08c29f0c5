//! Langlebige, widerrufbare Refresh-Tokens
//!
//! Ein Refresh-Token ist ein opaker Zufallswert (32 Byte aus dem OS-CSPRNG,
//! hex-kodiert). Er ist nur gueltig solange er gespeichert, nicht widerrufen
//! und nicht abgelaufen ist. Tokens werden nie geloescht, nur widerrufen.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chirpy_db::{
    models::{NeuerRefreshToken, WiderrufErgebnis},
    RefreshTokenRepository,
};
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Standard-Laufzeit eines Refresh-Tokens: 60 Tage
pub const STANDARD_LAUFZEIT_TAGE: i64 = 60;

const TOKEN_BYTES: usize = 32;

/// Erzeugt 32 zufaellige Bytes als Hex-String (64 Zeichen)
pub fn refresh_token_generieren() -> AuthResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::intern(format!("Zufallsquelle nicht verfuegbar: {e}")))?;
    Ok(hex::encode(bytes))
}

/// Verwaltet Refresh-Tokens ueber ein [`RefreshTokenRepository`]
pub struct RefreshTokenStore<R: RefreshTokenRepository> {
    repo: Arc<R>,
    laufzeit: Duration,
}

impl<R: RefreshTokenRepository> RefreshTokenStore<R> {
    pub fn neu(repo: Arc<R>) -> Self {
        Self::mit_laufzeit(repo, Duration::days(STANDARD_LAUFZEIT_TAGE))
    }

    pub fn mit_laufzeit(repo: Arc<R>, laufzeit: Duration) -> Self {
        Self { repo, laufzeit }
    }

    pub fn laufzeit(&self) -> Duration {
        self.laufzeit
    }

    /// Stellt einen neuen Token fuer den Benutzer aus und speichert ihn
    pub async fn ausstellen(&self, user_id: Uuid) -> AuthResult<String> {
        self.ausstellen_zum(user_id, Utc::now()).await
    }

    pub async fn ausstellen_zum(&self, user_id: Uuid, jetzt: DateTime<Utc>) -> AuthResult<String> {
        let expires_at = jetzt
            .checked_add_signed(self.laufzeit)
            .ok_or_else(|| AuthError::intern("Ablaufzeit ausserhalb des Zeitbereichs"))?;
        let token = refresh_token_generieren()?;

        self.repo
            .create(NeuerRefreshToken {
                token: &token,
                user_id,
                created_at: jetzt,
                expires_at,
            })
            .await?;

        tracing::debug!(user_id = %user_id, "Refresh-Token ausgestellt");
        Ok(token)
    }

    /// Loest einen Token zur Benutzer-ID auf
    pub async fn identitaet_aufloesen(&self, token: &str) -> AuthResult<Uuid> {
        self.identitaet_aufloesen_zum(token, Utc::now()).await
    }

    /// Reihenfolge: vorhanden, nicht widerrufen, nicht abgelaufen
    pub async fn identitaet_aufloesen_zum(
        &self,
        token: &str,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<Uuid> {
        let record = self
            .repo
            .get(token)
            .await?
            .ok_or(AuthError::TokenNichtGefunden)?;

        if record.revoked_at.is_some() {
            return Err(AuthError::TokenWiderrufen);
        }
        if jetzt >= record.expires_at {
            return Err(AuthError::TokenAbgelaufen);
        }
        Ok(record.user_id)
    }

    /// Widerruft einen Token
    ///
    /// Ein bereits widerrufener Token ist kein Fehler, `revoked_at` behaelt
    /// den ersten Zeitpunkt.
    pub async fn widerrufen(&self, token: &str) -> AuthResult<()> {
        match self.repo.revoke(token, Utc::now()).await? {
            WiderrufErgebnis::Widerrufen => {
                tracing::debug!("Refresh-Token widerrufen");
                Ok(())
            }
            WiderrufErgebnis::BereitsWiderrufen => {
                tracing::debug!("Refresh-Token war bereits widerrufen");
                Ok(())
            }
            WiderrufErgebnis::NichtGefunden => Err(AuthError::TokenNichtGefunden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_db::{models::NeuerBenutzer, SqliteDb, UserRepository};

    async fn store_mit_user() -> (RefreshTokenStore<SqliteDb>, Uuid) {
        let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory DB"));
        let user = UserRepository::create(
            db.as_ref(),
            NeuerBenutzer {
                email: "walt@breakingbad.com",
                password_hash: "hash",
            },
        )
        .await
        .unwrap();
        (RefreshTokenStore::neu(db), user.id)
    }

    #[test]
    fn token_format() {
        let token = refresh_token_generieren().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, refresh_token_generieren().unwrap());
    }

    #[tokio::test]
    async fn ausstellen_und_aufloesen() {
        let (store, user_id) = store_mit_user().await;
        let token = store.ausstellen(user_id).await.unwrap();
        assert_eq!(store.identitaet_aufloesen(&token).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn unbekannter_token() {
        let (store, _) = store_mit_user().await;
        assert!(matches!(
            store.identitaet_aufloesen("gibt-es-nicht").await,
            Err(AuthError::TokenNichtGefunden)
        ));
        assert!(matches!(
            store.widerrufen("gibt-es-nicht").await,
            Err(AuthError::TokenNichtGefunden)
        ));
    }

    #[tokio::test]
    async fn widerrufen_dann_aufloesen() {
        let (store, user_id) = store_mit_user().await;
        let token = store.ausstellen(user_id).await.unwrap();

        store.widerrufen(&token).await.unwrap();
        assert!(matches!(
            store.identitaet_aufloesen(&token).await,
            Err(AuthError::TokenWiderrufen)
        ));

        // Zweiter Widerruf ist idempotent
        store.widerrufen(&token).await.unwrap();
        assert!(matches!(
            store.identitaet_aufloesen(&token).await,
            Err(AuthError::TokenWiderrufen)
        ));
    }

    #[tokio::test]
    async fn ablauf_nach_laufzeit() {
        let (store, user_id) = store_mit_user().await;
        let start = Utc::now();
        let token = store.ausstellen_zum(user_id, start).await.unwrap();

        let kurz_davor = start + Duration::days(60) - Duration::seconds(1);
        assert_eq!(
            store.identitaet_aufloesen_zum(&token, kurz_davor).await.unwrap(),
            user_id
        );
        assert!(matches!(
            store
                .identitaet_aufloesen_zum(&token, start + Duration::days(60))
                .await,
            Err(AuthError::TokenAbgelaufen)
        ));
    }

    #[tokio::test]
    async fn riesige_laufzeit_ist_fehler_statt_panik() {
        let (store, user_id) = store_mit_user().await;
        let store = RefreshTokenStore::mit_laufzeit(Arc::clone(&store.repo), Duration::MAX);

        let ergebnis = store.ausstellen(user_id).await;
        assert!(matches!(ergebnis, Err(ref e) if e.ist_intern()));
    }

    #[tokio::test]
    async fn widerruf_hat_vorrang_vor_ablauf() {
        let (store, user_id) = store_mit_user().await;
        let start = Utc::now();
        let token = store.ausstellen_zum(user_id, start).await.unwrap();
        store.widerrufen(&token).await.unwrap();

        assert!(matches!(
            store
                .identitaet_aufloesen_zum(&token, start + Duration::days(90))
                .await,
            Err(AuthError::TokenWiderrufen)
        ));
    }

    #[tokio::test]
    async fn mehrere_logins_mehrere_tokens() {
        let (store, user_id) = store_mit_user().await;
        let erster = store.ausstellen(user_id).await.unwrap();
        let zweiter = store.ausstellen(user_id).await.unwrap();
        assert_ne!(erster, zweiter);

        store.widerrufen(&erster).await.unwrap();
        assert_eq!(store.identitaet_aufloesen(&zweiter).await.unwrap(), user_id);
    }
}
