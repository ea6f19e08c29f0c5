//! REST-Handler fuer Health, Besuchszaehler und Admin-Reset

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{Html, IntoResponse},
};

use crate::error::{ApiError, ApiResult};
use crate::rest::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// GET /api/healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], "OK")
}

/// GET /admin/metrics
pub async fn metrics_seite(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.metriken.hits()
    ))
}

/// POST /admin/reset – nur im Entwicklungsbetrieb
///
/// Setzt den Besuchszaehler zurueck und loescht alle Benutzer samt Chirps
/// und Refresh-Tokens.
pub async fn reset(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    if !state.plattform.ist_dev() {
        tracing::warn!(plattform = ?state.plattform, "Admin-Reset ausserhalb von dev abgelehnt");
        return Err(ApiError::Verboten(
            "Reset ist nur im Entwicklungsbetrieb erlaubt".into(),
        ));
    }

    state.metriken.hits_zuruecksetzen();
    let anzahl = state.auth.alle_benutzer_loeschen().await?;
    tracing::info!(benutzer = anzahl, "Admin-Reset ausgefuehrt");

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, TEXT_PLAIN)],
        "Hits reset to 0 and database reset to initial state.",
    ))
}
