//! REST-Handler fuer den Webhook des Zahlungsanbieters (Polka)

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use chirpy_auth::api_key_pruefen;

use crate::error::{ApiError, ApiResult};
use crate::rest::AppState;

/// Einziges Ereignis mit Wirkung
pub const EREIGNIS_UPGRADE: &str = "user.upgraded";

#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    pub event: String,
    #[serde(default)]
    pub data: WebhookDaten,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookDaten {
    pub user_id: Option<Uuid>,
}

/// POST /api/polka/webhooks – `Authorization: ApiKey <key>`
///
/// Unbekannte Ereignisse werden mit 204 quittiert und ignoriert.
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<WebhookBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    api_key_pruefen(&headers, &state.polka_key)?;
    let Json(body) = body?;

    if body.event != EREIGNIS_UPGRADE {
        tracing::debug!(event = %body.event, "Webhook-Ereignis ignoriert");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = body
        .data
        .user_id
        .ok_or_else(|| ApiError::UngueltigeAnfrage("data.user_id fehlt".into()))?;
    state.auth.upgraden(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
