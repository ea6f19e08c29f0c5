//! REST-Handler fuer Benutzer-Endpunkte

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::rest::{handlers::BenutzerAntwort, AppState};

#[derive(Debug, Deserialize)]
pub struct BenutzerBody {
    pub email: String,
    pub password: String,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<BenutzerBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    let benutzer = state.auth.registrieren(&body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(BenutzerAntwort::from(benutzer))))
}

/// PUT /api/users – aendert den angemeldeten Benutzer
pub async fn update_self(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<BenutzerBody>, JsonRejection>,
) -> ApiResult<Json<BenutzerAntwort>> {
    let identitaet = state.identitaet(&headers)?;
    let Json(body) = body?;
    let benutzer = state
        .auth
        .benutzer_aktualisieren(identitaet, identitaet, &body.email, &body.password)
        .await?;
    Ok(Json(benutzer.into()))
}

/// PUT /api/users/:id – nur wenn `id` der angemeldete Benutzer ist
pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<BenutzerBody>, JsonRejection>,
) -> ApiResult<Json<BenutzerAntwort>> {
    let identitaet = state.identitaet(&headers)?;
    let Path(ziel_id) = id?;
    let Json(body) = body?;
    let benutzer = state
        .auth
        .benutzer_aktualisieren(identitaet, ziel_id, &body.email, &body.password)
        .await?;
    Ok(Json(benutzer.into()))
}
