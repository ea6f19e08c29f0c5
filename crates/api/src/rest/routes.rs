//! Route-Definitionen fuer die REST-API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::rest::{handlers, AppState};

/// Erstellt den Router fuer `/api/...` und `/admin/...`
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Admin
        .route("/api/healthz", get(handlers::admin::healthz))
        .route("/admin/metrics", get(handlers::admin::metrics_seite))
        .route("/admin/reset", post(handlers::admin::reset))
        // Benutzer
        .route("/api/users", post(handlers::users::create_user))
        .route("/api/users", put(handlers::users::update_self))
        .route("/api/users/:id", put(handlers::users::update_user))
        // Tokens
        .route("/api/login", post(handlers::tokens::login))
        .route("/api/refresh", post(handlers::tokens::refresh))
        .route("/api/revoke", post(handlers::tokens::revoke))
        // Chirps
        .route("/api/validate_chirp", post(handlers::chirps::validate_chirp))
        .route("/api/chirps", post(handlers::chirps::create_chirp))
        .route("/api/chirps", get(handlers::chirps::list_chirps))
        .route("/api/chirps/:id", get(handlers::chirps::get_chirp))
        .route("/api/chirps/:id", delete(handlers::chirps::delete_chirp))
        // Webhooks
        .route("/api/polka/webhooks", post(handlers::webhooks::polka_webhook))
}
