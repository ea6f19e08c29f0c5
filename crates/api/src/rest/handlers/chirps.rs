//! REST-Handler fuer Chirp-Endpunkte

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chirpy_chat::{Chirp, ChirpAbfrage};
use chirpy_db::models::Sortierung;

use crate::error::{ApiError, ApiResult};
use crate::rest::AppState;

/// Ein `user_id` im Body wird ignoriert, der Verfasser kommt aus dem Token
#[derive(Debug, Deserialize)]
pub struct ChirpBody {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct ValidierungAntwort {
    pub cleaned_body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListeQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

impl ListeQuery {
    fn abfrage(self) -> ApiResult<ChirpAbfrage> {
        let author_id = match self.author_id.as_deref() {
            None | Some("") => None,
            Some(id) => Some(Uuid::parse_str(id).map_err(|_| {
                ApiError::UngueltigeAnfrage(format!("Ungueltige author_id: {id}"))
            })?),
        };
        // Alles ausser "desc" sortiert aufsteigend
        let sortierung = match self.sort.as_deref() {
            Some("desc") => Sortierung::Desc,
            _ => Sortierung::Asc,
        };
        Ok(ChirpAbfrage {
            author_id,
            sortierung,
        })
    }
}

/// POST /api/validate_chirp
pub async fn validate_chirp(
    State(state): State<AppState>,
    body: Result<Json<ChirpBody>, JsonRejection>,
) -> ApiResult<Json<ValidierungAntwort>> {
    let Json(body) = body?;
    let cleaned_body = state.chirps.pruefen(&body.body)?;
    Ok(Json(ValidierungAntwort { cleaned_body }))
}

/// POST /api/chirps
pub async fn create_chirp(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChirpBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let identitaet = state.identitaet(&headers)?;
    let Json(body) = body?;
    let chirp = state.chirps.erstellen(identitaet, &body.body).await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// GET /api/chirps?author_id=&sort=asc|desc
pub async fn list_chirps(
    State(state): State<AppState>,
    query: Result<Query<ListeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Chirp>>> {
    let Query(query) = query?;
    let chirps = state.chirps.auflisten(query.abfrage()?).await?;
    Ok(Json(chirps))
}

/// GET /api/chirps/:id
pub async fn get_chirp(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Chirp>> {
    let Path(id) = id?;
    Ok(Json(state.chirps.laden(id).await?))
}

/// DELETE /api/chirps/:id
///
/// Reihenfolge: Anmeldung (401), Existenz (404), Eigentum (403).
pub async fn delete_chirp(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let identitaet = state.identitaet(&headers)?;
    let Path(id) = id?;
    state.chirps.loeschen(identitaet, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
