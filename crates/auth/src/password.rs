//! Passwort-Hashing mit Argon2id
//!
//! Der erzeugte PHC-String enthaelt Algorithmus, Parameter und Salt. Die
//! Verifikation liest diese Werte aus dem Hash, aeltere Hashes bleiben also
//! gueltig wenn sich die konfigurierten Parameter aendern.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Kostenparameter fuer Argon2id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Parameter {
    /// Speicherbedarf in KiB
    pub speicher_kib: u32,
    pub iterationen: u32,
    pub parallelitaet: u32,
}

impl Default for Argon2Parameter {
    /// OWASP-Empfehlung: 64 MiB, 3 Iterationen, 1 Thread
    fn default() -> Self {
        Self {
            speicher_kib: 64 * 1024,
            iterationen: 3,
            parallelitaet: 1,
        }
    }
}

impl Argon2Parameter {
    /// Minimale Kosten, nur fuer Tests und lokale Entwicklung
    pub fn schnell() -> Self {
        Self {
            speicher_kib: 1024,
            iterationen: 1,
            parallelitaet: 1,
        }
    }
}

/// Argon2id-Hasher mit festen Kostenparametern
#[derive(Debug, Clone)]
pub struct PasswortHasher {
    params: Params,
}

impl PasswortHasher {
    pub fn neu(parameter: Argon2Parameter) -> AuthResult<Self> {
        let params = Params::new(
            parameter.speicher_kib,
            parameter.iterationen,
            parameter.parallelitaet,
            None,
        )
        .map_err(|e| AuthError::PasswortHashing(format!("Ungueltige Argon2-Parameter: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hasht ein Passwort mit frischem Salt, gibt den PHC-String zurueck
    pub fn hashen(&self, passwort: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(passwort.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswortHashing(e.to_string()))
    }

    /// Prueft ein Passwort gegen einen gespeicherten PHC-Hash
    ///
    /// `Ok(false)` bei falschem Passwort, `Err` nur bei kaputtem Hash.
    pub fn verifizieren(&self, passwort: &str, hash: &str) -> AuthResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

        match self.argon2().verify_password(passwort.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
        }
    }
}

impl Default for PasswortHasher {
    fn default() -> Self {
        Self {
            params: Params::new(64 * 1024, 3, 1, None).unwrap_or_default(),
        }
    }
}

/// Hasht mit den Standardparametern
pub fn passwort_hashen(passwort: &str) -> AuthResult<String> {
    PasswortHasher::default().hashen(passwort)
}

/// Verifiziert gegen einen beliebigen Argon2-PHC-Hash
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> AuthResult<bool> {
    PasswortHasher::default().verifizieren(passwort, hash)
}
