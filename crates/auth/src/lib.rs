//! chirpy-auth – Identitaet, Tokens und Autorisierung
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Kurzlebige signierte Access-Tokens (JWT, HS256)
//! - Langlebige, widerrufbare Refresh-Tokens (persistiert)
//! - Extraktion von Bearer-Token und API-Key aus Request-Headern
//! - Eigentuemer-Pruefung fuer mutierende Operationen
//! - AuthService (Registrierung, Login, Refresh, Revoke, Benutzer-Update, Upgrade)

pub mod access_token;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod password;
pub mod refresh_token;
pub mod service;

// Bequeme Re-Exporte
pub use access_token::{ttl_aus_sekunden, ttl_begrenzen, AccessTokenService, MAX_TTL_SEKUNDEN};
pub use credentials::{api_key_extrahieren, api_key_pruefen, bearer_token_extrahieren};
pub use error::{AuthError, AuthResult};
pub use guard::{eigentuemer_pruefen, eigentum_pruefen, AutorisierungsWaechter, Eigentum};
pub use password::{passwort_hashen, passwort_verifizieren, Argon2Parameter, PasswortHasher};
pub use refresh_token::RefreshTokenStore;
pub use service::{Anmeldung, AuthService};
