//! Anmeldedaten aus Request-Headern
//!
//! Zwei Schemata im `Authorization`-Header:
//! - `Bearer <token>` fuer Access- und Refresh-Tokens
//! - `ApiKey <key>` nur fuer den Webhook des Zahlungsanbieters

use http::{header::AUTHORIZATION, HeaderMap};
use subtle::ConstantTimeEq;

use crate::error::{AuthError, AuthResult};

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

fn authorization_schema<'a>(headers: &'a HeaderMap, prefix: &str) -> AuthResult<&'a str> {
    let wert = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::AnmeldedatenFehlen)?;

    let inhalt = wert
        .strip_prefix(prefix)
        .map(str::trim)
        .ok_or(AuthError::AnmeldedatenFehlen)?;

    if inhalt.is_empty() {
        return Err(AuthError::AnmeldedatenFehlen);
    }
    Ok(inhalt)
}

/// Liest das Token aus `Authorization: Bearer <token>`
pub fn bearer_token_extrahieren(headers: &HeaderMap) -> AuthResult<&str> {
    authorization_schema(headers, BEARER_PREFIX)
}

/// Liest den Schluessel aus `Authorization: ApiKey <key>`
pub fn api_key_extrahieren(headers: &HeaderMap) -> AuthResult<&str> {
    authorization_schema(headers, API_KEY_PREFIX)
}

/// Vergleicht den uebermittelten API-Key in konstanter Zeit
///
/// Fehlender oder falscher Key ergibt `NichtAutorisiert`. Ein leerer
/// erwarteter Key laesst niemanden durch.
pub fn api_key_pruefen(headers: &HeaderMap, erwartet: &str) -> AuthResult<()> {
    let key = api_key_extrahieren(headers).map_err(|_| AuthError::NichtAutorisiert)?;

    if erwartet.is_empty() {
        tracing::warn!("Webhook-Key ist nicht konfiguriert, Anfrage abgelehnt");
        return Err(AuthError::NichtAutorisiert);
    }

    if bool::from(key.as_bytes().ct_eq(erwartet.as_bytes())) {
        Ok(())
    } else {
        Err(AuthError::NichtAutorisiert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(authorization: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(authorization).unwrap());
        h
    }

    #[test]
    fn bearer_token_wird_gelesen() {
        let h = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token_extrahieren(&h).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn bearer_fehlt_oder_falsches_schema() {
        assert!(matches!(
            bearer_token_extrahieren(&HeaderMap::new()),
            Err(AuthError::AnmeldedatenFehlen)
        ));
        for wert in ["Basic dXNlcjpwdw==", "Bearer ", "Bearer    ", "bearer abc", "abc"] {
            assert!(
                matches!(
                    bearer_token_extrahieren(&headers(wert)),
                    Err(AuthError::AnmeldedatenFehlen)
                ),
                "{wert:?}"
            );
        }
    }

    #[test]
    fn api_key_schema_ist_getrennt() {
        let h = headers("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(
            api_key_extrahieren(&h).unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
        assert!(bearer_token_extrahieren(&h).is_err());
        assert!(api_key_extrahieren(&headers("Bearer xyz")).is_err());
    }

    #[test]
    fn api_key_vergleich() {
        let h = headers("ApiKey richtig");
        assert!(api_key_pruefen(&h, "richtig").is_ok());
        assert!(matches!(
            api_key_pruefen(&h, "falsch"),
            Err(AuthError::NichtAutorisiert)
        ));
        assert!(matches!(
            api_key_pruefen(&h, "richtig-aber-laenger"),
            Err(AuthError::NichtAutorisiert)
        ));
        assert!(matches!(
            api_key_pruefen(&HeaderMap::new(), "richtig"),
            Err(AuthError::NichtAutorisiert)
        ));
    }

    #[test]
    fn leerer_erwarteter_key_lehnt_ab() {
        assert!(matches!(
            api_key_pruefen(&headers("ApiKey x"), ""),
            Err(AuthError::NichtAutorisiert)
        ));
    }
}
