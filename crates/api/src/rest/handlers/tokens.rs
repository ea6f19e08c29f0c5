//! REST-Handler fuer Login, Token-Erneuerung und Widerruf

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use chirpy_auth::{bearer_token_extrahieren, ttl_aus_sekunden};

use crate::error::ApiResult;
use crate::rest::{handlers::BenutzerAntwort, middleware::bearer_header, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
    /// Gewuenschte Lebensdauer des Access-Tokens, hoechstens 1 Stunde
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LoginAntwort {
    #[serde(flatten)]
    pub benutzer: BenutzerAntwort,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenAntwort {
    pub token: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    let ttl = body.expires_in_seconds.map(ttl_aus_sekunden);

    let anmeldung = state.auth.anmelden(&body.email, &body.password, ttl).await?;

    let headers = bearer_header(&anmeldung.access_token);
    Ok((
        StatusCode::OK,
        headers,
        Json(LoginAntwort {
            benutzer: anmeldung.benutzer.into(),
            token: anmeldung.access_token,
            refresh_token: anmeldung.refresh_token,
        }),
    ))
}

/// POST /api/refresh – Refresh-Token als Bearer
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TokenAntwort>> {
    let refresh_token = bearer_token_extrahieren(&headers)?;
    let token = state.auth.access_token_erneuern(refresh_token).await?;
    Ok(Json(TokenAntwort { token }))
}

/// POST /api/revoke – Refresh-Token als Bearer
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let refresh_token = bearer_token_extrahieren(&headers)?;
    state.auth.refresh_token_widerrufen(refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
