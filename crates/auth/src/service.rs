//! Auth-Service fuer Vorlage
//!
//! Zentraler Service fuer Registrierung, Login, Logout und Session-Verwaltung.
//! Alle Abhaengigkeiten werden beim Erstellen uebergeben.

use std::sync::Arc;

use vorlage_core::UserId;
use vorlage_db::{models::BenutzerRecord, DbError, UserRepository};

use crate::{
    error::{AuthError, AuthResult},
    password::PasswortHasher,
    serializer::{serialisieren, SessionSerializer},
    session::{Session, SessionStore},
    strategie::LokaleStrategie,
    vorbereitung::{aenderung_vorbereiten, neuen_benutzer_vorbereiten, BenutzerAenderung, Registrierung},
};

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    hasher: PasswortHasher,
    strategie: LokaleStrategie,
    serializer: SessionSerializer,
    session_store: Arc<SessionStore>,
}

impl AuthService {
    /// Erstellt einen neuen AuthService
    pub fn neu(
        user_repo: Arc<dyn UserRepository>,
        hasher: PasswortHasher,
        session_store: Arc<SessionStore>,
    ) -> Self {
        Self {
            strategie: LokaleStrategie::neu(Arc::clone(&user_repo), hasher.clone()),
            serializer: SessionSerializer::neu(Arc::clone(&user_repo)),
            user_repo,
            hasher,
            session_store,
        }
    }

    /// Registriert einen neuen Benutzer
    ///
    /// Die Eindeutigkeit der E-Mail entscheidet allein der Store.
    pub async fn registrieren(&self, registrierung: Registrierung) -> AuthResult<BenutzerRecord> {
        let neu = neuen_benutzer_vorbereiten(&self.hasher, registrierung, false).await?;
        let benutzer = self.anlegen(neu).await?;

        tracing::info!(user_id = %benutzer.id, "Neuer Benutzer registriert");
        Ok(benutzer)
    }

    /// Legt einen Administrator an, falls die E-Mail noch frei ist
    ///
    /// Gibt `true` zurueck wenn ein neuer Account angelegt wurde. Ein
    /// bestehender Account wird nicht veraendert.
    pub async fn admin_sicherstellen(&self, email: &str, passwort: &str) -> AuthResult<bool> {
        let neu = neuen_benutzer_vorbereiten(
            &self.hasher,
            Registrierung {
                email: email.to_owned(),
                passwort: passwort.to_owned(),
                ..Default::default()
            },
            true,
        )
        .await?;

        match self.anlegen(neu).await {
            Ok(admin) => {
                tracing::info!(user_id = %admin.id, "Administrator angelegt");
                Ok(true)
            }
            Err(AuthError::EmailVergeben(_)) => {
                tracing::debug!("Administrator existiert bereits");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn anlegen(&self, neu: vorlage_db::models::NeuerBenutzer) -> AuthResult<BenutzerRecord> {
        let email = neu.email.clone();
        self.user_repo.create(neu).await.map_err(|e| match e {
            e if e.ist_eindeutigkeit() => AuthError::EmailVergeben(email),
            e => AuthError::Datenbank(e),
        })
    }

    /// Prueft E-Mail und Passwort ohne eine Session anzulegen
    pub async fn authentifizieren(&self, email: &str, passwort: &str) -> AuthResult<BenutzerRecord> {
        self.strategie.authentifizieren(email, passwort).await
    }

    /// Meldet einen Benutzer an und erstellt eine neue Session
    ///
    /// Gibt den Benutzer-Record und die Session zurueck.
    ///
    /// Nach dem Anlegen der Session wird der Hash erneut gelesen. Hat eine
    /// gleichzeitige Passwortaenderung ihn inzwischen ersetzt, wird die
    /// Session sofort wieder verworfen.
    pub async fn anmelden(&self, email: &str, passwort: &str) -> AuthResult<(BenutzerRecord, Session)> {
        let benutzer = self.strategie.authentifizieren(email, passwort).await?;
        let session = self.session_store.erstellen(serialisieren(&benutzer)).await?;

        let aktuell = match self.benutzer_laden(benutzer.id).await {
            Ok(aktuell) => aktuell,
            Err(e) => {
                self.session_store.invalidieren(&session.token).await;
                return Err(e);
            }
        };
        if aktuell.password_hash != benutzer.password_hash {
            self.session_store.invalidieren(&session.token).await;
            tracing::info!(user_id = %benutzer.id, "Login verworfen, Passwort wurde gerade geaendert");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        tracing::info!(user_id = %benutzer.id, "Benutzer angemeldet");
        Ok((benutzer, session))
    }

    /// Meldet einen Benutzer ab und invalidiert die Session
    pub async fn abmelden(&self, session_token: &str) {
        if self.session_store.invalidieren(session_token).await {
            tracing::debug!("Session invalidiert (Abmeldung)");
        }
    }

    /// Validiert einen Session-Token und gibt den zugehoerigen Benutzer zurueck
    ///
    /// Laesst sich der Benutzer nicht mehr aufloesen, wird die Session
    /// verworfen und `SessionUngueltig` zurueckgegeben.
    pub async fn session_validieren(&self, session_token: &str) -> AuthResult<BenutzerRecord> {
        let session = match self.session_store.validieren(session_token).await {
            Ok(s) => s,
            Err(AuthError::SessionAbgelaufen) => {
                self.session_store.invalidieren(session_token).await;
                return Err(AuthError::SessionAbgelaufen);
            }
            Err(e) => return Err(e),
        };

        match self.serializer.deserialisieren(&session.benutzer_token).await {
            Err(AuthError::SessionUngueltig) => {
                self.session_store.invalidieren(session_token).await;
                tracing::info!("Session verworfen, Benutzer nicht mehr aufloesbar");
                Err(AuthError::SessionUngueltig)
            }
            ergebnis => ergebnis,
        }
    }

    /// Speichert Aenderungen an einem Benutzer
    ///
    /// Das Passwort wird nur neu gehasht, wenn es sich gegenueber dem
    /// gespeicherten Stand geaendert hat.
    pub async fn speichern(&self, id: UserId, aenderung: BenutzerAenderung) -> AuthResult<BenutzerRecord> {
        let gespeichert = self.benutzer_laden(id).await?;
        let update = aenderung_vorbereiten(&self.hasher, &gespeichert, aenderung).await?;
        let passwort_neu = update.password_hash.is_some();

        let benutzer = self.user_repo.update(id, update).await.map_err(|e| match e {
            DbError::NichtGefunden(_) => AuthError::BenutzerNichtGefunden,
            e => AuthError::Datenbank(e),
        })?;

        tracing::debug!(user_id = %id, passwort_neu, "Benutzer gespeichert");
        Ok(benutzer)
    }

    /// Aendert das Passwort eines Benutzers
    ///
    /// Erfordert das alte Passwort zur Verifikation.
    /// Invalidiert alle bestehenden Sessions des Benutzers, vor und nach dem
    /// Schreiben des neuen Hashes. Logins, die noch das alte Passwort
    /// geprueft haben, verwirft [`anmelden`](Self::anmelden) selbst.
    pub async fn passwort_aendern(
        &self,
        id: UserId,
        altes_passwort: &str,
        neues_passwort: &str,
    ) -> AuthResult<()> {
        let benutzer = self.benutzer_laden(id).await?;

        let korrekt = self
            .hasher
            .verifizieren_async(altes_passwort.to_owned(), benutzer.password_hash.clone())
            .await?;
        if !korrekt {
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        let benutzer_token = serialisieren(&benutzer);
        let mut anzahl = self.session_store.alle_invalidieren(&benutzer_token).await;

        self.speichern(
            id,
            BenutzerAenderung {
                passwort: Some(neues_passwort.to_owned()),
                ..Default::default()
            },
        )
        .await?;

        anzahl += self.session_store.alle_invalidieren(&benutzer_token).await;
        tracing::info!(
            user_id = %id,
            invalidierte_sessions = anzahl,
            "Passwort geaendert, Sessions invalidiert"
        );

        Ok(())
    }

    async fn benutzer_laden(&self, id: UserId) -> AuthResult<BenutzerRecord> {
        self.user_repo
            .get_by_id(id)
            .await?
            .ok_or(AuthError::BenutzerNichtGefunden)
    }
}
