//! Fehlertypen der HTTP-Schicht

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use vorlage_auth::AuthError;

use crate::rest::middleware::fehler_antwort;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Nicht angemeldet")]
    NichtAngemeldet,

    #[error("E-Mail bereits vergeben: {0}")]
    EmailVergeben(String),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
            Self::NichtAngemeldet => StatusCode::UNAUTHORIZED,
            Self::EmailVergeben(_) => StatusCode::CONFLICT,
            Self::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text fuer den Client. Interne Details bleiben im Log.
    fn oeffentliche_nachricht(&self) -> String {
        match self {
            Self::Intern(_) => "Interner Serverfehler".to_string(),
            Self::EmailVergeben(_) => "E-Mail-Adresse bereits registriert".to_string(),
            andere => andere.to_string(),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UngueltigeEingabe(msg) => Self::UngueltigeEingabe(msg),
            AuthError::EmailVergeben(email) => Self::EmailVergeben(email),
            e if e.ist_sessionfehler() => Self::NichtAngemeldet,
            // Anmeldefehler werden im Login-Handler als Redirect behandelt
            e if e.ist_anmeldefehler() => Self::NichtAngemeldet,
            e => Self::Intern(e.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(fehler = %self, "Anfrage fehlgeschlagen");
        }
        fehler_antwort(status, &self.oeffentliche_nachricht())
    }
}
