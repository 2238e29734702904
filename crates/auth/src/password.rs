//! Passwort-Hashing mit Argon2id
//!
//! Der Work-Factor (Speicher, Iterationen, Parallelismus) ist konfigurierbar.
//! Hoehere Werte kosten Latenz pro Login, erschweren aber Brute-Force.
//! Die `_async`-Varianten verlagern die Rechenarbeit auf den
//! Blocking-Threadpool von tokio.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};

/// Standard-Speicherbedarf: 64 MiB
pub const STANDARD_SPEICHER_KIB: u32 = 64 * 1024;
/// Standard-Iterationen
pub const STANDARD_ITERATIONEN: u32 = 3;
/// Standard-Parallelismus
pub const STANDARD_PARALLELITAET: u32 = 1;

/// Argon2id-Hasher mit festem Work-Factor
#[derive(Debug, Clone)]
pub struct PasswortHasher {
    params: Params,
}

impl PasswortHasher {
    /// Erstellt einen Hasher mit den Standardwerten
    pub fn standard() -> AuthResult<Self> {
        Self::mit_parametern(
            STANDARD_SPEICHER_KIB,
            STANDARD_ITERATIONEN,
            STANDARD_PARALLELITAET,
        )
    }

    /// Erstellt einen Hasher mit eigenem Work-Factor
    ///
    /// Gibt `AuthError::PasswortHashing` zurueck wenn Argon2 die Parameter
    /// ablehnt (z.B. Speicher kleiner als 8 KiB pro Thread).
    pub fn mit_parametern(speicher_kib: u32, iterationen: u32, parallelitaet: u32) -> AuthResult<Self> {
        let params = Params::new(speicher_kib, iterationen, parallelitaet, None)
            .map_err(|e| AuthError::PasswortHashing(format!("Ungueltige Argon2-Parameter: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hasht ein Passwort mit einem zufaelligen Salt
    ///
    /// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
    pub fn hashen(&self, passwort: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(passwort.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswortHashing(e.to_string()))
    }

    /// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
    ///
    /// Die Parameter werden aus dem Hash gelesen, aeltere Hashes mit anderem
    /// Work-Factor bleiben also pruefbar.
    pub fn verifizieren(&self, passwort: &str, hash: &str) -> AuthResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

        match self.argon2().verify_password(passwort.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
        }
    }

    /// Wie [`hashen`](Self::hashen), aber auf dem Blocking-Threadpool
    pub async fn hashen_async(&self, passwort: String) -> AuthResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hashen(&passwort))
            .await
            .map_err(|e| AuthError::intern(format!("Hash-Task abgebrochen: {e}")))?
    }

    /// Wie [`verifizieren`](Self::verifizieren), aber auf dem Blocking-Threadpool
    pub async fn verifizieren_async(&self, passwort: String, hash: String) -> AuthResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verifizieren(&passwort, &hash))
            .await
            .map_err(|e| AuthError::intern(format!("Verifikations-Task abgebrochen: {e}")))?
    }
}

/// Kleinster zulaessiger Work-Factor, nur fuer Tests
#[cfg(test)]
pub(crate) fn test_hasher() -> PasswortHasher {
    PasswortHasher::mit_parametern(8, 1, 1).expect("Minimal-Parameter muessen gueltig sein")
}
