//! Integration-Tests fuer die REST-API (In-Memory SQLite, Router per oneshot)

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use chirpy_api::rest::server::app_bauen;
use chirpy_api::{AppState, Plattform, RestServerKonfig};
use chirpy_auth::{
    AccessTokenService, Argon2Parameter, AuthService, PasswortHasher, RefreshTokenStore,
};
use chirpy_chat::ChirpService;
use chirpy_db::SqliteDb;
use chirpy_observability::ChirpyMetrics;

const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

struct TestApp {
    router: Router,
    metriken: ChirpyMetrics,
    _statisch: tempfile::TempDir,
}

async fn test_app(plattform: Plattform) -> TestApp {
    let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory DB"));
    let tokens = Arc::new(AccessTokenService::neu("test-secret", Duration::hours(1)).unwrap());
    let auth = Arc::new(AuthService::neu(
        Arc::clone(&db),
        PasswortHasher::neu(Argon2Parameter::schnell()).unwrap(),
        tokens,
        RefreshTokenStore::neu(Arc::clone(&db)),
    ));
    let chirps = ChirpService::neu(db);
    let metriken = ChirpyMetrics::neu().unwrap();

    let statisch = tempfile::tempdir().unwrap();
    std::fs::write(
        statisch.path().join("index.html"),
        "<html><body><h1>Welcome to Chirpy</h1></body></html>",
    )
    .unwrap();

    let state = AppState::neu(auth, chirps, metriken.clone(), plattform, POLKA_KEY);
    let konfig = RestServerKonfig {
        statisches_verzeichnis: statisch.path().to_path_buf(),
        ..Default::default()
    };

    TestApp {
        router: app_bauen(state, &konfig),
        metriken,
        _statisch: statisch,
    }
}

struct Antwort {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    text: String,
}

impl Antwort {
    fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

impl TestApp {
    async fn anfrage(
        &self,
        methode: Method,
        pfad: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> Antwort {
        let mut builder = Request::builder().method(methode).uri(pfad);
        if let Some(wert) = authorization {
            builder = builder.header(header::AUTHORIZATION, wert);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let antwort = self.router.clone().oneshot(request).await.unwrap();
        let status = antwort.status();
        let headers = antwort.headers().clone();
        let bytes = to_bytes(antwort.into_body(), usize::MAX).await.unwrap();
        Antwort {
            status,
            headers,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    async fn registrieren(&self, email: &str, passwort: &str) -> Value {
        let antwort = self
            .anfrage(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "email": email, "password": passwort })),
            )
            .await;
        assert_eq!(antwort.status, StatusCode::CREATED, "{}", antwort.text);
        antwort.json()
    }

    /// Gibt (Access-Token, Refresh-Token, User-ID) zurueck
    async fn anmelden(&self, email: &str, passwort: &str) -> (String, String, String) {
        let antwort = self
            .anfrage(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": passwort })),
            )
            .await;
        assert_eq!(antwort.status, StatusCode::OK, "{}", antwort.text);
        let json = antwort.json();
        (
            json["token"].as_str().unwrap().to_string(),
            json["refresh_token"].as_str().unwrap().to_string(),
            json["id"].as_str().unwrap().to_string(),
        )
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[tokio::test]
async fn healthz() {
    let app = test_app(Plattform::Dev).await;
    let antwort = app.anfrage(Method::GET, "/api/healthz", None, None).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.text, "OK");
    assert!(antwort.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn benutzer_registrieren() {
    let app = test_app(Plattform::Dev).await;
    let json = app.registrieren("walt@breakingbad.com", "123456").await;

    assert_eq!(json["email"], "walt@breakingbad.com");
    assert_eq!(json["is_chirpy_red"], false);
    assert!(Uuid::parse_str(json["id"].as_str().unwrap()).is_ok());
    assert!(json.get("created_at").is_some());
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());

    // Doppelte E-Mail
    let doppelt = app
        .anfrage(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "email": "walt@breakingbad.com", "password": "x" })),
        )
        .await;
    assert_eq!(doppelt.status, StatusCode::CONFLICT);
    assert_eq!(doppelt.json()["error"]["code"], 409);
}

#[tokio::test]
async fn kaputter_body_ist_400() {
    let app = test_app(Plattform::Dev).await;
    let antwort = app
        .anfrage(Method::POST, "/api/users", None, Some(json!({ "email": 42 })))
        .await;
    assert_eq!(antwort.status, StatusCode::BAD_REQUEST);
    assert!(antwort.json()["error"]["message"].is_string());
}

#[tokio::test]
async fn login_liefert_tokens_und_header() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("saul@bettercall.com", "123456").await;

    let antwort = app
        .anfrage(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "saul@bettercall.com", "password": "123456" })),
        )
        .await;
    assert_eq!(antwort.status, StatusCode::OK);

    let json = antwort.json();
    let token = json["token"].as_str().unwrap();
    assert_eq!(json["email"], "saul@bettercall.com");
    assert_eq!(json["refresh_token"].as_str().unwrap().len(), 64);
    assert_eq!(
        antwort.headers[header::AUTHORIZATION].to_str().unwrap(),
        bearer(token)
    );
}

#[tokio::test]
async fn login_mit_falschen_daten() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("saul@bettercall.com", "123456").await;

    for (email, passwort) in [
        ("saul@bettercall.com", "falsch"),
        ("niemand@example.com", "123456"),
    ] {
        let antwort = app
            .anfrage(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": passwort })),
            )
            .await;
        assert_eq!(antwort.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn szenario_chirp_erstellen_und_loeschen() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("walt@breakingbad.com", "123456").await;
    let (token, _, user_id) = app.anmelden("walt@breakingbad.com", "123456").await;

    let erstellt = app
        .anfrage(
            Method::POST,
            "/api/chirps",
            Some(&bearer(&token)),
            Some(json!({ "body": "I'm the one who knocks! Kerfuffle" })),
        )
        .await;
    assert_eq!(erstellt.status, StatusCode::CREATED, "{}", erstellt.text);
    let chirp = erstellt.json();
    assert_eq!(chirp["body"], "I'm the one who knocks! ****");
    assert_eq!(chirp["user_id"], user_id.as_str());

    let id = chirp["id"].as_str().unwrap();
    let pfad = format!("/api/chirps/{id}");

    let geladen = app.anfrage(Method::GET, &pfad, None, None).await;
    assert_eq!(geladen.status, StatusCode::OK);
    assert_eq!(geladen.json()["id"], id);

    let geloescht = app
        .anfrage(Method::DELETE, &pfad, Some(&bearer(&token)), None)
        .await;
    assert_eq!(geloescht.status, StatusCode::NO_CONTENT);

    let nochmal = app
        .anfrage(Method::DELETE, &pfad, Some(&bearer(&token)), None)
        .await;
    assert_eq!(nochmal.status, StatusCode::NOT_FOUND);

    let weg = app.anfrage(Method::GET, &pfad, None, None).await;
    assert_eq!(weg.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn verfasser_kommt_aus_dem_token() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("a@example.com", "pw").await;
    let b = app.registrieren("b@example.com", "pw").await;
    let (token_a, _, id_a) = app.anmelden("a@example.com", "pw").await;

    let antwort = app
        .anfrage(
            Method::POST,
            "/api/chirps",
            Some(&bearer(&token_a)),
            Some(json!({ "body": "von a", "user_id": b["id"] })),
        )
        .await;
    assert_eq!(antwort.status, StatusCode::CREATED);
    assert_eq!(antwort.json()["user_id"], id_a.as_str());
}

#[tokio::test]
async fn chirp_ohne_gueltiges_token() {
    let app = test_app(Plattform::Dev).await;
    let body = Some(json!({ "body": "hallo" }));

    let ohne = app
        .anfrage(Method::POST, "/api/chirps", None, body.clone())
        .await;
    assert_eq!(ohne.status, StatusCode::UNAUTHORIZED);

    let kaputt = app
        .anfrage(Method::POST, "/api/chirps", Some("Bearer kaputt"), body.clone())
        .await;
    assert_eq!(kaputt.status, StatusCode::UNAUTHORIZED);

    // Token mit anderem Secret signiert
    let fremd = AccessTokenService::neu("anderes-secret", Duration::hours(1))
        .unwrap()
        .ausstellen(Uuid::new_v4())
        .unwrap();
    let gefaelscht = app
        .anfrage(Method::POST, "/api/chirps", Some(&bearer(&fremd)), body)
        .await;
    assert_eq!(gefaelscht.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn fremden_chirp_loeschen_ist_403() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("a@example.com", "pw").await;
    app.registrieren("b@example.com", "pw").await;
    let (token_a, _, _) = app.anmelden("a@example.com", "pw").await;
    let (token_b, _, _) = app.anmelden("b@example.com", "pw").await;

    let chirp = app
        .anfrage(
            Method::POST,
            "/api/chirps",
            Some(&bearer(&token_a)),
            Some(json!({ "body": "meins" })),
        )
        .await
        .json();
    let pfad = format!("/api/chirps/{}", chirp["id"].as_str().unwrap());

    let antwort = app
        .anfrage(Method::DELETE, &pfad, Some(&bearer(&token_b)), None)
        .await;
    assert_eq!(antwort.status, StatusCode::FORBIDDEN);

    // Nicht existent: 404, auch fuer Fremde
    let unbekannt = app
        .anfrage(
            Method::DELETE,
            &format!("/api/chirps/{}", Uuid::new_v4()),
            Some(&bearer(&token_b)),
            None,
        )
        .await;
    assert_eq!(unbekannt.status, StatusCode::NOT_FOUND);

    // Ohne Token: 401 vor allem anderen
    let anonym = app.anfrage(Method::DELETE, &pfad, None, None).await;
    assert_eq!(anonym.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ungueltige_ids_sind_400() {
    let app = test_app(Plattform::Dev).await;

    let pfad = app
        .anfrage(Method::GET, "/api/chirps/keine-uuid", None, None)
        .await;
    assert_eq!(pfad.status, StatusCode::BAD_REQUEST);

    let query = app
        .anfrage(Method::GET, "/api/chirps?author_id=keine-uuid", None, None)
        .await;
    assert_eq!(query.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chirps_auflisten() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("a@example.com", "pw").await;
    app.registrieren("b@example.com", "pw").await;
    let (token_a, _, id_a) = app.anmelden("a@example.com", "pw").await;
    let (token_b, _, _) = app.anmelden("b@example.com", "pw").await;

    for (token, body) in [(&token_a, "eins"), (&token_b, "zwei"), (&token_a, "drei")] {
        let antwort = app
            .anfrage(
                Method::POST,
                "/api/chirps",
                Some(&bearer(token)),
                Some(json!({ "body": body })),
            )
            .await;
        assert_eq!(antwort.status, StatusCode::CREATED);
    }

    let bodies = |json: Value| -> Vec<String> {
        json.as_array()
            .unwrap()
            .iter()
            .map(|c| c["body"].as_str().unwrap().to_string())
            .collect()
    };

    let alle = app.anfrage(Method::GET, "/api/chirps", None, None).await;
    assert_eq!(alle.status, StatusCode::OK);
    assert_eq!(bodies(alle.json()), ["eins", "zwei", "drei"]);

    let absteigend = app
        .anfrage(Method::GET, "/api/chirps?sort=desc", None, None)
        .await;
    assert_eq!(bodies(absteigend.json()), ["drei", "zwei", "eins"]);

    let von_a = app
        .anfrage(
            Method::GET,
            &format!("/api/chirps?author_id={id_a}&sort=asc"),
            None,
            None,
        )
        .await;
    assert_eq!(bodies(von_a.json()), ["eins", "drei"]);
}

#[tokio::test]
async fn validate_chirp() {
    let app = test_app(Plattform::Dev).await;

    let ok = app
        .anfrage(
            Method::POST,
            "/api/validate_chirp",
            None,
            Some(json!({ "body": "I had something interesting for breakfast, sharbert" })),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(
        ok.json()["cleaned_body"],
        "I had something interesting for breakfast, ****"
    );

    let zu_lang = app
        .anfrage(
            Method::POST,
            "/api/validate_chirp",
            None,
            Some(json!({ "body": "x".repeat(141) })),
        )
        .await;
    assert_eq!(zu_lang.status, StatusCode::BAD_REQUEST);
    assert_eq!(zu_lang.json()["error"]["code"], 400);
}

#[tokio::test]
async fn refresh_und_revoke() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("r@example.com", "pw").await;
    let (_, refresh_token, _) = app.anmelden("r@example.com", "pw").await;

    let erneuert = app
        .anfrage(Method::POST, "/api/refresh", Some(&bearer(&refresh_token)), None)
        .await;
    assert_eq!(erneuert.status, StatusCode::OK);
    let neues_token = erneuert.json()["token"].as_str().unwrap().to_string();

    // Neues Access-Token funktioniert
    let chirp = app
        .anfrage(
            Method::POST,
            "/api/chirps",
            Some(&bearer(&neues_token)),
            Some(json!({ "body": "nach refresh" })),
        )
        .await;
    assert_eq!(chirp.status, StatusCode::CREATED);

    let widerrufen = app
        .anfrage(Method::POST, "/api/revoke", Some(&bearer(&refresh_token)), None)
        .await;
    assert_eq!(widerrufen.status, StatusCode::NO_CONTENT);
    assert!(widerrufen.text.is_empty());

    let danach = app
        .anfrage(Method::POST, "/api/refresh", Some(&bearer(&refresh_token)), None)
        .await;
    assert_eq!(danach.status, StatusCode::UNAUTHORIZED);

    // Zweiter Widerruf ist idempotent
    let nochmal = app
        .anfrage(Method::POST, "/api/revoke", Some(&bearer(&refresh_token)), None)
        .await;
    assert_eq!(nochmal.status, StatusCode::NO_CONTENT);

    let ohne = app.anfrage(Method::POST, "/api/refresh", None, None).await;
    assert_eq!(ohne.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn benutzer_aktualisieren() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("alt@example.com", "altes_pw").await;
    let b = app.registrieren("b@example.com", "pw").await;
    let (token, _, id) = app.anmelden("alt@example.com", "altes_pw").await;

    let neu = json!({ "email": "neu@example.com", "password": "neues_pw" });

    let ohne = app
        .anfrage(Method::PUT, "/api/users", None, Some(neu.clone()))
        .await;
    assert_eq!(ohne.status, StatusCode::UNAUTHORIZED);

    let fremd = app
        .anfrage(
            Method::PUT,
            &format!("/api/users/{}", b["id"].as_str().unwrap()),
            Some(&bearer(&token)),
            Some(neu.clone()),
        )
        .await;
    assert_eq!(fremd.status, StatusCode::FORBIDDEN);

    let ok = app
        .anfrage(Method::PUT, "/api/users", Some(&bearer(&token)), Some(neu.clone()))
        .await;
    assert_eq!(ok.status, StatusCode::OK, "{}", ok.text);
    assert_eq!(ok.json()["email"], "neu@example.com");
    assert_eq!(ok.json()["id"], id.as_str());

    let explizit = app
        .anfrage(
            Method::PUT,
            &format!("/api/users/{id}"),
            Some(&bearer(&token)),
            Some(json!({ "email": "neu2@example.com", "password": "pw2" })),
        )
        .await;
    assert_eq!(explizit.status, StatusCode::OK);

    app.anmelden("neu2@example.com", "pw2").await;
}

#[tokio::test]
async fn polka_webhook() {
    let app = test_app(Plattform::Dev).await;
    let user = app.registrieren("red@example.com", "pw").await;
    let api_key = format!("ApiKey {POLKA_KEY}");
    let upgrade = json!({ "event": "user.upgraded", "data": { "user_id": user["id"] } });

    let ohne_key = app
        .anfrage(Method::POST, "/api/polka/webhooks", None, Some(upgrade.clone()))
        .await;
    assert_eq!(ohne_key.status, StatusCode::UNAUTHORIZED);

    let falscher_key = app
        .anfrage(
            Method::POST,
            "/api/polka/webhooks",
            Some("ApiKey falsch"),
            Some(upgrade.clone()),
        )
        .await;
    assert_eq!(falscher_key.status, StatusCode::UNAUTHORIZED);

    let anderes_ereignis = app
        .anfrage(
            Method::POST,
            "/api/polka/webhooks",
            Some(&api_key),
            Some(json!({ "event": "user.payment_failed", "data": { "user_id": user["id"] } })),
        )
        .await;
    assert_eq!(anderes_ereignis.status, StatusCode::NO_CONTENT);

    let unbekannt = app
        .anfrage(
            Method::POST,
            "/api/polka/webhooks",
            Some(&api_key),
            Some(json!({ "event": "user.upgraded", "data": { "user_id": Uuid::new_v4() } })),
        )
        .await;
    assert_eq!(unbekannt.status, StatusCode::NOT_FOUND);

    let ok = app
        .anfrage(Method::POST, "/api/polka/webhooks", Some(&api_key), Some(upgrade))
        .await;
    assert_eq!(ok.status, StatusCode::NO_CONTENT);

    let login = app
        .anfrage(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "red@example.com", "password": "pw" })),
        )
        .await;
    assert_eq!(login.json()["is_chirpy_red"], true);
}

#[tokio::test]
async fn fileserver_zaehlt_besuche() {
    let app = test_app(Plattform::Dev).await;

    let index = app.anfrage(Method::GET, "/app/", None, None).await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.text.contains("Welcome to Chirpy"));

    app.anfrage(Method::GET, "/app/", None, None).await;
    assert_eq!(app.metriken.hits(), 2);

    let seite = app.anfrage(Method::GET, "/admin/metrics", None, None).await;
    assert_eq!(seite.status, StatusCode::OK);
    assert!(seite.text.contains("Chirpy has been visited 2 times!"));

    // API-Aufrufe zaehlen nicht
    app.anfrage(Method::GET, "/api/healthz", None, None).await;
    assert_eq!(app.metriken.hits(), 2);

    let prometheus = app.anfrage(Method::GET, "/metrics", None, None).await;
    assert_eq!(prometheus.status, StatusCode::OK);
    assert!(prometheus.text.contains("fileserver_hits 2"));
}

#[tokio::test]
async fn reset_nur_in_dev() {
    let prod = test_app(Plattform::Prod).await;
    prod.registrieren("bleibt@example.com", "pw").await;
    let verboten = prod.anfrage(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(verboten.status, StatusCode::FORBIDDEN);
    prod.anmelden("bleibt@example.com", "pw").await;

    let dev = test_app(Plattform::Dev).await;
    dev.registrieren("weg@example.com", "pw").await;
    dev.anfrage(Method::GET, "/app/", None, None).await;
    assert_eq!(dev.metriken.hits(), 1);

    let reset = dev.anfrage(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(reset.status, StatusCode::OK);
    assert_eq!(dev.metriken.hits(), 0);

    let login = dev
        .anfrage(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "weg@example.com", "password": "pw" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);

    // E-Mail ist wieder frei
    dev.registrieren("weg@example.com", "pw").await;
}

#[tokio::test]
async fn login_ttl_wird_begrenzt() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("ttl@example.com", "pw").await;

    let antwort = app
        .anfrage(
            Method::POST,
            "/api/login",
            None,
            Some(json!({
                "email": "ttl@example.com",
                "password": "pw",
                "expires_in_seconds": 86400
            })),
        )
        .await;
    assert_eq!(antwort.status, StatusCode::OK);
    let token = antwort.json()["token"].as_str().unwrap().to_string();

    // Nach 1 Stunde abgelaufen, trotz angefragter 24 Stunden
    let tokens = AccessTokenService::neu("test-secret", Duration::hours(1)).unwrap();
    let spaeter = chrono::Utc::now() + Duration::hours(1) + Duration::seconds(1);
    assert!(tokens.validieren_zum(&token, spaeter).is_err());
    assert!(tokens.validieren(&token).is_ok());
}

#[tokio::test]
async fn login_mit_extremer_ttl() {
    let app = test_app(Plattform::Dev).await;
    app.registrieren("max@example.com", "pw").await;
    let tokens = AccessTokenService::neu("test-secret", Duration::hours(1)).unwrap();

    for extrem in [i64::MAX, i64::MIN] {
        let antwort = app
            .anfrage(
                Method::POST,
                "/api/login",
                None,
                Some(json!({
                    "email": "max@example.com",
                    "password": "pw",
                    "expires_in_seconds": extrem
                })),
            )
            .await;
        assert_eq!(antwort.status, StatusCode::OK, "{extrem}");

        let token = antwort.json()["token"].as_str().unwrap().to_string();
        let spaeter = chrono::Utc::now() + Duration::hours(1) + Duration::seconds(1);
        assert!(tokens.validieren(&token).is_ok());
        assert!(tokens.validieren_zum(&token, spaeter).is_err());
    }
}
