//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Eingabe ---
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Authentifizierung ---
    /// Keine Benutzer mit dieser E-Mail. Nach aussen nicht von
    /// `UngueltigeAnmeldedaten` unterscheidbar.
    #[error("Benutzer nicht gefunden")]
    BenutzerNichtGefunden,

    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    // --- Session ---
    #[error("Session nicht gefunden oder ungueltig")]
    SessionUngueltig,

    #[error("Session abgelaufen")]
    SessionAbgelaufen,

    // --- Benutzerverwaltung ---
    #[error("E-Mail bereits vergeben: {0}")]
    EmailVergeben(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] vorlage_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn ungueltige_eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }

    /// Gibt true zurueck bei fehlgeschlagener Anmeldung mit falschen Daten
    ///
    /// Beide Faelle muessen fuer Aufrufer gleich aussehen, damit nicht
    /// erkennbar ist, welche E-Mails registriert sind.
    pub fn ist_anmeldefehler(&self) -> bool {
        matches!(self, Self::BenutzerNichtGefunden | Self::UngueltigeAnmeldedaten)
    }

    /// Gibt true zurueck wenn eine Session nicht (mehr) aufgeloest werden kann
    pub fn ist_sessionfehler(&self) -> bool {
        matches!(self, Self::SessionUngueltig | Self::SessionAbgelaufen)
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
