//! Kurzlebige Access-Tokens (JWT, HS256)
//!
//! Ein Access-Token belegt die Identitaet ohne Datenbankzugriff. Es gibt keinen
//! Widerruf, die Lebensdauer ist deshalb auf hoechstens eine Stunde begrenzt.
//!
//! Claims: `iss` = "chirpy", `sub` = Benutzer-ID, `iat`, `exp` (Unix-Sekunden).

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Fester Aussteller in jedem Token
pub const AUSSTELLER: &str = "chirpy";

/// Obergrenze (und Standard) fuer die Token-Lebensdauer: 1 Stunde
pub const MAX_TTL_SEKUNDEN: i64 = 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    iat: i64,
    exp: i64,
}

/// Begrenzt eine angefragte Lebensdauer
///
/// Keine Angabe, null, negativ oder mehr als eine Stunde ergibt eine Stunde.
pub fn ttl_begrenzen(angefragt: Option<Duration>) -> Duration {
    let max = Duration::seconds(MAX_TTL_SEKUNDEN);
    match angefragt {
        Some(ttl) if ttl > Duration::zero() && ttl <= max => ttl,
        _ => max,
    }
}

/// Begrenzt eine in Sekunden angefragte Lebensdauer
///
/// Die Begrenzung passiert vor dem Bau der `Duration`, beliebige `i64`
/// aus Client-Eingaben sind damit sicher.
pub fn ttl_aus_sekunden(sekunden: i64) -> Duration {
    if sekunden > 0 && sekunden <= MAX_TTL_SEKUNDEN {
        Duration::seconds(sekunden)
    } else {
        Duration::seconds(MAX_TTL_SEKUNDEN)
    }
}

/// Stellt Access-Tokens aus und validiert sie
///
/// Zustandslos, das Secret wird beim Start gesetzt und nie veraendert.
pub struct AccessTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    standard_ttl: Duration,
}

impl AccessTokenService {
    /// Erstellt den Service; `standard_ttl` wird ebenfalls begrenzt
    pub fn neu(secret: &str, standard_ttl: Duration) -> AuthResult<Self> {
        if secret.is_empty() {
            return Err(AuthError::intern("JWT-Secret darf nicht leer sein"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Ablauf wird gegen die uebergebene Uhr geprueft, nicht in jsonwebtoken
        validation.validate_exp = false;
        validation.required_spec_claims =
            HashSet::from(["exp".to_string(), "iss".to_string()]);
        validation.set_issuer(&[AUSSTELLER]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            standard_ttl: ttl_begrenzen(Some(standard_ttl)),
        })
    }

    pub fn standard_ttl(&self) -> Duration {
        self.standard_ttl
    }

    /// Stellt ein Token mit der Standard-Lebensdauer aus
    pub fn ausstellen(&self, user_id: Uuid) -> AuthResult<String> {
        self.ausstellen_zum(user_id, Some(self.standard_ttl), Utc::now())
    }

    /// Stellt ein Token mit angefragter (begrenzter) Lebensdauer aus
    pub fn ausstellen_mit_ttl(&self, user_id: Uuid, ttl: Option<Duration>) -> AuthResult<String> {
        self.ausstellen_zum(user_id, ttl.or(Some(self.standard_ttl)), Utc::now())
    }

    pub fn ausstellen_zum(
        &self,
        user_id: Uuid,
        ttl: Option<Duration>,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<String> {
        let iat = jetzt.timestamp();
        let claims = Claims {
            iss: AUSSTELLER.to_string(),
            sub: Some(user_id.to_string()),
            iat,
            exp: iat + ttl_begrenzen(ttl).num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::intern(format!("Token konnte nicht signiert werden: {e}")))
    }

    /// Validiert ein Token und gibt die Benutzer-ID zurueck
    pub fn validieren(&self, token: &str) -> AuthResult<Uuid> {
        self.validieren_zum(token, Utc::now())
    }

    /// Signatur zuerst, dann Ablauf, dann Subjekt
    pub fn validieren_zum(&self, token: &str, jetzt: DateTime<Utc>) -> AuthResult<Uuid> {
        let daten = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::SignaturUngueltig,
                ErrorKind::ExpiredSignature => AuthError::TokenAbgelaufen,
                _ => AuthError::TokenFehlerhaft(e.to_string()),
            }
        })?;

        if jetzt.timestamp() >= daten.claims.exp {
            return Err(AuthError::TokenAbgelaufen);
        }

        daten
            .claims
            .sub
            .as_deref()
            .and_then(|sub| Uuid::parse_str(sub).ok())
            .ok_or(AuthError::SubjektFehlt)
    }
}
