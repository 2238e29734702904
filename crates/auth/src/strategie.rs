//! Lokale Anmelde-Strategie (E-Mail + Passwort)

use std::sync::Arc;

use tokio::sync::OnceCell;
use vorlage_db::{models::BenutzerRecord, UserRepository};

use crate::error::{AuthError, AuthResult};
use crate::password::PasswortHasher;

/// Klartext fuer den Ausgleichs-Hash bei unbekannter E-Mail
const AUSGLEICH_PASSWORT: &str = "vorlage-unbekannter-benutzer";

/// Prueft E-Mail und Passwort gegen den Credential Store
#[derive(Clone)]
pub struct LokaleStrategie {
    user_repo: Arc<dyn UserRepository>,
    hasher: PasswortHasher,
    /// Hash mit demselben Work-Factor, wird beim ersten Bedarf erzeugt
    ausgleich_hash: Arc<OnceCell<String>>,
}

impl LokaleStrategie {
    pub fn neu(user_repo: Arc<dyn UserRepository>, hasher: PasswortHasher) -> Self {
        Self {
            user_repo,
            hasher,
            ausgleich_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Authentifiziert einen Benutzer
    ///
    /// - keine Benutzer mit exakt dieser E-Mail: `BenutzerNichtGefunden`
    /// - Passwort passt nicht: `UngueltigeAnmeldedaten`
    /// - Store nicht erreichbar: `Datenbank`
    ///
    /// Auch bei unbekannter E-Mail laeuft eine volle Argon2-Verifikation,
    /// damit die Antwortzeit keine registrierten Adressen verraet.
    pub async fn authentifizieren(&self, email: &str, passwort: &str) -> AuthResult<BenutzerRecord> {
        let Some(benutzer) = self.user_repo.get_by_email(email).await? else {
            self.ausgleich_verifizieren(passwort).await;
            return Err(AuthError::BenutzerNichtGefunden);
        };

        let korrekt = self
            .hasher
            .verifizieren_async(passwort.to_owned(), benutzer.password_hash.clone())
            .await?;

        if !korrekt {
            tracing::warn!(user_id = %benutzer.id, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        Ok(benutzer)
    }

    async fn ausgleich_verifizieren(&self, passwort: &str) {
        let hash = self
            .ausgleich_hash
            .get_or_try_init(|| self.hasher.hashen_async(AUSGLEICH_PASSWORT.to_owned()))
            .await;
        let ergebnis = match hash {
            Ok(hash) => {
                self.hasher
                    .verifizieren_async(passwort.to_owned(), hash.clone())
                    .await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = ergebnis {
            tracing::debug!(fehler = %e, "Ausgleichs-Verifikation fehlgeschlagen");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::test_hasher;
    use crate::test_support::{DefektesRepo, SpeicherRepo};
    use vorlage_db::models::NeuerBenutzer;

    async fn strategie_mit_benutzer(email: &str, passwort: &str) -> (LokaleStrategie, BenutzerRecord) {
        let hasher = test_hasher();
        let repo = Arc::new(SpeicherRepo::default());
        let benutzer = repo
            .create(NeuerBenutzer {
                email: email.into(),
                password_hash: hasher.hashen(passwort).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();
        (LokaleStrategie::neu(repo, hasher), benutzer)
    }

    #[tokio::test]
    async fn richtige_daten() {
        let (strategie, benutzer) = strategie_mit_benutzer("a@b.com", "secret123").await;
        let angemeldet = strategie.authentifizieren("a@b.com", "secret123").await.unwrap();
        assert_eq!(angemeldet.id, benutzer.id);
    }

    #[tokio::test]
    async fn falsches_passwort() {
        let (strategie, _) = strategie_mit_benutzer("a@b.com", "secret123").await;
        let ergebnis = strategie.authentifizieren("a@b.com", "wrong").await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeAnmeldedaten)));
    }

    #[tokio::test]
    async fn unbekannte_email() {
        let (strategie, _) = strategie_mit_benutzer("a@b.com", "secret123").await;
        let ergebnis = strategie.authentifizieren("x@y.com", "secret123").await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzerNichtGefunden)));
    }

    #[tokio::test]
    async fn unbekannte_email_verifiziert_trotzdem() {
        let (strategie, _) = strategie_mit_benutzer("a@b.com", "secret123").await;
        assert!(strategie.ausgleich_hash.get().is_none());

        let ergebnis = strategie.authentifizieren("x@y.com", AUSGLEICH_PASSWORT).await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzerNichtGefunden)));

        // Der Ausgleichs-Hash existiert jetzt und hat denselben Work-Factor
        let hash = strategie.ausgleich_hash.get().expect("kein Ausgleichs-Hash");
        let echter = strategie.hasher.hashen("egal").unwrap();
        let parameter = |h: &str| h.split('$').nth(3).map(str::to_owned);
        assert_eq!(parameter(hash), parameter(&echter));

        // Klone teilen den Hash
        let klon = strategie.clone();
        assert_eq!(klon.ausgleich_hash.get(), Some(hash));
    }

    #[tokio::test]
    async fn email_muss_exakt_passen() {
        let (strategie, _) = strategie_mit_benutzer("a@b.com", "secret123").await;
        let ergebnis = strategie.authentifizieren("A@B.com", "secret123").await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzerNichtGefunden)));
    }

    #[tokio::test]
    async fn store_fehler_ist_kein_anmeldefehler() {
        let strategie = LokaleStrategie::neu(Arc::new(DefektesRepo), test_hasher());
        let err = strategie
            .authentifizieren("a@b.com", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Datenbank(_)));
        assert!(!err.ist_anmeldefehler());
    }
}
