//! Antwort-Helfer fuer die REST-API

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Fehlerantwort fuer REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// Header-Map mit `Authorization: Bearer <token>`
///
/// Ein Token mit ungueltigen Header-Zeichen wird ausgelassen.
pub fn bearer_header(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(wert) = HeaderValue::from_str(&format!("Bearer {token}")) {
        headers.insert(AUTHORIZATION, wert);
    }
    headers
}
