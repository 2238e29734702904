//! Session-Serializer
//!
//! In der Session steht nur die Benutzer-ID. Bei jeder Anfrage, die eine
//! Identitaet braucht, wird der vollstaendige Datensatz frisch geladen.

use std::sync::Arc;

use vorlage_core::UserId;
use vorlage_db::{models::BenutzerRecord, UserRepository};

use crate::error::{AuthError, AuthResult};

/// Benutzer -> Benutzer-Token (die ID, sonst nichts)
pub fn serialisieren(benutzer: &BenutzerRecord) -> String {
    benutzer.id.to_string()
}

/// Loest Benutzer-Tokens wieder in Benutzer auf
#[derive(Clone)]
pub struct SessionSerializer {
    user_repo: Arc<dyn UserRepository>,
}

impl SessionSerializer {
    pub fn neu(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Benutzer-Token -> Benutzer
    ///
    /// Ungueltige IDs und geloeschte Benutzer ergeben `SessionUngueltig`,
    /// Store-Fehler werden als `Datenbank` weitergereicht.
    pub async fn deserialisieren(&self, token: &str) -> AuthResult<BenutzerRecord> {
        let id: UserId = token.parse().map_err(|_| {
            tracing::warn!("Ungueltige Benutzer-ID in Session");
            AuthError::SessionUngueltig
        })?;

        self.user_repo
            .get_by_id(id)
            .await?
            .ok_or(AuthError::SessionUngueltig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DefektesRepo, SpeicherRepo};
    use vorlage_db::models::NeuerBenutzer;

    #[tokio::test]
    async fn rundreise_ueber_id() {
        let repo = Arc::new(SpeicherRepo::default());
        let benutzer = repo
            .create(NeuerBenutzer {
                email: "a@b.com".into(),
                password_hash: "hash".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let token = serialisieren(&benutzer);
        assert_eq!(token, benutzer.id.to_string());

        let serializer = SessionSerializer::neu(repo);
        let geladen = serializer.deserialisieren(&token).await.unwrap();
        assert_eq!(geladen, benutzer);
    }

    #[tokio::test]
    async fn unbekannte_id_ist_ungueltig() {
        let serializer = SessionSerializer::neu(Arc::new(SpeicherRepo::default()));
        let ergebnis = serializer.deserialisieren(&UserId::new().to_string()).await;
        assert!(matches!(ergebnis, Err(AuthError::SessionUngueltig)));
    }

    #[tokio::test]
    async fn kaputte_id_ist_ungueltig() {
        let serializer = SessionSerializer::neu(Arc::new(SpeicherRepo::default()));
        let ergebnis = serializer.deserialisieren("kein-uuid").await;
        assert!(matches!(ergebnis, Err(AuthError::SessionUngueltig)));
    }

    #[tokio::test]
    async fn store_fehler_wird_weitergereicht() {
        let serializer = SessionSerializer::neu(Arc::new(DefektesRepo));
        let ergebnis = serializer.deserialisieren(&UserId::new().to_string()).await;
        assert!(matches!(ergebnis, Err(AuthError::Datenbank(_))));
    }
}
