//! vorlage-auth – Registrierung, Login und Sessions
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id (Work-Factor konfigurierbar)
//! - Vorbereitung von Benutzer-Datensaetzen fuer die Persistenz (Hash nur bei Aenderung)
//! - Lokale Strategie: E-Mail + Passwort gegen den Credential Store pruefen
//! - Session-Serializer: Benutzer <-> Benutzer-Token (die ID)
//! - Session-Store (in-memory mit TTL)
//! - AuthService als Einstiegspunkt fuer die Web-Schicht

pub mod error;
pub mod password;
pub mod serializer;
pub mod service;
pub mod session;
pub mod strategie;
pub mod vorbereitung;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use password::PasswortHasher;
pub use serializer::{serialisieren, SessionSerializer};
pub use service::AuthService;
pub use session::{Session, SessionStore};
pub use strategie::LokaleStrategie;
pub use vorbereitung::{BenutzerAenderung, Registrierung};

#[cfg(test)]
mod test_support;
