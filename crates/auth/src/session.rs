//! Session-Management fuer Vorlage
//!
//! Der Client bekommt nur einen zufaelligen Session-Token (im Cookie).
//! Der Store bildet ihn auf den serialisierten Benutzer-Token ab.
//! Sessions werden im Speicher gehalten (in-memory HashMap mit TTL).
//! Ein Hintergrund-Task bereinigt abgelaufene Sessions automatisch.

use std::{collections::HashMap, sync::Arc, time::Duration};

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{AuthError, AuthResult};

/// Standard-Session-Lebensdauer: 24 Stunden
pub const STANDARD_TTL_SEKUNDEN: i64 = 24 * 60 * 60;

/// Obergrenze fuer die Session-Lebensdauer: 10 Jahre
pub const MAX_TTL_SEKUNDEN: i64 = 10 * 365 * 24 * 60 * 60;

/// Intervall fuer den automatischen Cleanup-Task: 15 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(15 * 60);

/// Eine aktive Session
#[derive(Debug, Clone)]
pub struct Session {
    /// Der Token-String (URL-sicheres Base64)
    pub token: String,
    /// Serialisierter Benutzer (siehe [`crate::serializer`])
    pub benutzer_token: String,
    /// Zeitpunkt der Session-Erstellung
    pub erstellt_am: DateTime<Utc>,
    /// Zeitpunkt des Session-Ablaufs
    pub laeuft_ab_am: DateTime<Utc>,
}

impl Session {
    /// Gibt `true` zurueck wenn die Session noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.laeuft_ab_am
    }
}

/// In-Memory Session-Store mit TTL-Unterstuetzung
#[derive(Debug)]
pub struct SessionStore {
    /// token -> Session
    sessions: RwLock<HashMap<String, Session>>,
    ttl: chrono::Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::leer(chrono::Duration::seconds(STANDARD_TTL_SEKUNDEN))
    }
}

impl SessionStore {
    /// Erstellt einen neuen leeren Session-Store mit Standard-TTL
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Erstellt einen leeren Session-Store mit eigener Lebensdauer
    ///
    /// Lebensdauern ueber [`MAX_TTL_SEKUNDEN`] werden abgelehnt.
    pub fn mit_ttl(ttl_sekunden: i64) -> AuthResult<Self> {
        if ttl_sekunden > MAX_TTL_SEKUNDEN {
            return Err(AuthError::ungueltige_eingabe(format!(
                "Session-TTL {ttl_sekunden}s ueberschreitet {MAX_TTL_SEKUNDEN}s"
            )));
        }
        let ttl = chrono::Duration::try_seconds(ttl_sekunden).ok_or_else(|| {
            AuthError::ungueltige_eingabe(format!("Session-TTL {ttl_sekunden}s ausserhalb des Bereichs"))
        })?;
        Ok(Self::leer(ttl))
    }

    fn leer(ttl: chrono::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Startet den Cleanup-Task fuer den Store
    pub fn cleanup_starten(store: Arc<Self>) -> Arc<Self> {
        let store_klon = Arc::clone(&store);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = store_klon.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Sessions bereinigt");
                }
            }
        });
        store
    }

    /// Erstellt eine neue Session fuer einen serialisierten Benutzer
    pub async fn erstellen(&self, benutzer_token: String) -> AuthResult<Session> {
        let jetzt = Utc::now();
        let laeuft_ab_am = jetzt
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::intern("Session-Ablauf liegt ausserhalb des Zeitbereichs"))?;
        let token = token_generieren();
        let session = Session {
            token: token.clone(),
            benutzer_token,
            erstellt_am: jetzt,
            laeuft_ab_am,
        };

        self.sessions.write().await.insert(token, session.clone());
        tracing::debug!(benutzer = %session.benutzer_token, "Neue Session erstellt");
        Ok(session)
    }

    /// Validiert einen Session-Token und gibt die Session zurueck
    ///
    /// Gibt `AuthError::SessionUngueltig` zurueck wenn der Token nicht gefunden wurde.
    /// Gibt `AuthError::SessionAbgelaufen` zurueck wenn die Session abgelaufen ist.
    pub async fn validieren(&self, token: &str) -> AuthResult<Session> {
        let sessions = self.sessions.read().await;
        match sessions.get(token) {
            None => Err(AuthError::SessionUngueltig),
            Some(session) if !session.ist_gueltig() => Err(AuthError::SessionAbgelaufen),
            Some(session) => Ok(session.clone()),
        }
    }

    /// Invalidiert (loescht) eine Session anhand des Tokens
    ///
    /// Gibt `true` zurueck wenn eine Session entfernt wurde.
    pub async fn invalidieren(&self, token: &str) -> bool {
        let entfernt = self.sessions.write().await.remove(token).is_some();
        if entfernt {
            tracing::debug!("Session invalidiert");
        }
        entfernt
    }

    /// Invalidiert alle Sessions eines Benutzers (z.B. bei Passwortaenderung)
    pub async fn alle_invalidieren(&self, benutzer_token: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        let vorher = sessions.len();
        sessions.retain(|_, s| s.benutzer_token != benutzer_token);
        let entfernt = vorher - sessions.len();
        if entfernt > 0 {
            tracing::debug!(benutzer = %benutzer_token, anzahl = entfernt, "Alle Sessions des Benutzers invalidiert");
        }
        entfernt
    }

    /// Bereinigt abgelaufene Sessions und gibt die Anzahl der entfernten Sessions zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Utc::now();
        let mut sessions = self.sessions.write().await;
        let vorher = sessions.len();
        sessions.retain(|_, s| s.laeuft_ab_am > jetzt);
        vorher - sessions.len()
    }

    /// Gibt die Anzahl der aktiven (nicht abgelaufenen) Sessions zurueck
    pub async fn anzahl_aktive(&self) -> usize {
        let jetzt = Utc::now();
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| s.laeuft_ab_am > jetzt).count()
    }
}

/// Generiert einen kryptografisch sicheren Session-Token (URL-sicheres Base64)
fn token_generieren() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
