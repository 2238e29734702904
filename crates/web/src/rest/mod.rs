//! REST-Interface fuer Vorlage

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::http::HeaderMap;
use vorlage_auth::AuthService;
use vorlage_observability::VorlageMetrics;

pub use server::{app, RestServer, RestServerKonfig};

/// Einstellungen fuer das Session-Cookie
#[derive(Debug, Clone)]
pub struct CookieKonfig {
    pub name: String,
    /// Setzt das `Secure`-Attribut (nur ueber HTTPS senden)
    pub secure: bool,
}

impl Default for CookieKonfig {
    fn default() -> Self {
        Self {
            name: "vorlage.sid".to_string(),
            secure: false,
        }
    }
}

/// Inhalt der Startseite
#[derive(Debug, Clone)]
pub struct Willkommen {
    pub titel: String,
    pub nachricht: String,
}

impl Default for Willkommen {
    fn default() -> Self {
        Self {
            titel: "Willkommen bei Vorlage!".to_string(),
            nachricht: "Glueckwunsch, es funktioniert!".to_string(),
        }
    }
}

/// Axum-State fuer den REST-Server
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub metriken: VorlageMetrics,
    pub cookie: CookieKonfig,
    pub willkommen: Willkommen,
    /// Redirect-Ziel nach fehlgeschlagenem Login
    pub login_fehler_ziel: String,
}

impl AppState {
    pub fn neu(auth: Arc<AuthService>, metriken: VorlageMetrics) -> Self {
        Self {
            auth,
            metriken,
            cookie: CookieKonfig::default(),
            willkommen: Willkommen::default(),
            login_fehler_ziel: "/".to_string(),
        }
    }

    /// Liest den Session-Token aus dem Cookie-Header
    pub fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        middleware::cookie_lesen(headers, &self.cookie.name)
    }
}
