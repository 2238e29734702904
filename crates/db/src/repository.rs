//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Die Traits sind objektsicher, damit Auth- und
//! Web-Schicht sie als `Arc<dyn UserRepository>` injiziert bekommen.

use async_trait::async_trait;
use vorlage_core::{PostId, UserId};

use crate::error::DbError;
use crate::models::{BeitragRecord, BenutzerRecord, BenutzerUpdate, NeuerBeitrag, NeuerBenutzer};

/// Result-Alias fuer Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://vorlage.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://vorlage.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Credential Store fuer Benutzer
///
/// Die Eindeutigkeit der E-Mail wird von der Datenbank erzwungen:
/// `create` mit einer bereits vergebenen E-Mail liefert
/// [`DbError::Eindeutigkeit`] und legt keinen zweiten Datensatz an.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Legt einen neuen Benutzer an (Passwort bereits gehasht)
    async fn create(&self, data: NeuerBenutzer) -> DbResult<BenutzerRecord>;

    /// Laedt einen Benutzer anhand seiner ID
    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>>;

    /// Laedt einen Benutzer anhand seiner E-Mail (exakter Vergleich)
    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Aendert die gesetzten Felder und gibt den neuen Stand zurueck
    async fn update(&self, id: UserId, data: BenutzerUpdate) -> DbResult<BenutzerRecord>;
}

/// Repository fuer Beitraege
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, data: NeuerBeitrag) -> DbResult<BeitragRecord>;

    async fn get_by_id(&self, id: PostId) -> DbResult<Option<BeitragRecord>>;

    /// Alle Beitraege eines Autors, neueste zuerst
    async fn list_by_author(&self, author_id: UserId) -> DbResult<Vec<BeitragRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_config_standard() {
        let cfg = DatabaseConfig::default();
        assert!(cfg.sqlite_wal);
        assert_eq!(cfg.max_verbindungen, 5);
        assert!(cfg.url.starts_with("sqlite://"));
    }
}
