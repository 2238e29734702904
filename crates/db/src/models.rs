//! Datenbankmodelle fuer Vorlage
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den Antwort-Typen der Web-Schicht getrennt; insbesondere
//! verlaesst `password_hash` niemals den Server.

use chrono::{DateTime, Utc};
use vorlage_core::{PostId, UserId};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenutzerRecord {
    pub id: UserId,
    pub email: String,
    /// PHC-String des Passwort-Hashers, nie Klartext
    pub password_hash: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
///
/// `password_hash` muss bereits gehasht sein; das Repository hasht nicht.
#[derive(Debug, Clone, Default)]
pub struct NeuerBenutzer {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub is_admin: bool,
}

/// Daten zum Aktualisieren eines Benutzers
///
/// `None` bedeutet "Feld nicht aendern". Bei `name` und `title` loescht
/// `Some(None)` den Wert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenutzerUpdate {
    pub password_hash: Option<String>,
    pub name: Option<Option<String>>,
    pub title: Option<Option<String>>,
    pub is_admin: Option<bool>,
}

impl BenutzerUpdate {
    /// Gibt true zurueck wenn kein Feld geaendert wird
    pub fn ist_leer(&self) -> bool {
        self.password_hash.is_none()
            && self.name.is_none()
            && self.title.is_none()
            && self.is_admin.is_none()
    }
}

// ---------------------------------------------------------------------------
// Beitraege
// ---------------------------------------------------------------------------

/// Beitrags-Datensatz aus der Datenbank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeitragRecord {
    pub id: PostId,
    pub title: Option<String>,
    pub body: Option<String>,
    pub author_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Beitrags
#[derive(Debug, Clone, Default)]
pub struct NeuerBeitrag {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author_id: Option<UserId>,
}
