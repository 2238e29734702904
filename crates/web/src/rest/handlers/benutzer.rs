//! REST-Handler fuer Registrierung, Login, Logout und den aktuellen Benutzer

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use vorlage_auth::{AuthError, Registrierung};
use vorlage_db::models::BenutzerRecord;
use vorlage_observability::metrics::ergebnis;

use crate::error::{WebError, WebResult};
use crate::rest::{
    middleware::{session_cookie_loeschen, session_cookie_setzen},
    AppState,
};

/// Nach aussen sichtbare Benutzerdaten (ohne Passwort-Hash)
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BenutzerAntwort {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub is_admin: bool,
}

impl From<&BenutzerRecord> for BenutzerAntwort {
    fn from(b: &BenutzerRecord) -> Self {
        Self {
            id: b.id.to_string(),
            email: b.email.clone(),
            name: b.name.clone(),
            title: b.title.clone(),
            is_admin: b.is_admin,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginFormular {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `is_admin` ist bewusst kein Feld: Admin-Rechte kommen nie aus der Anfrage
#[derive(Debug, Deserialize)]
pub struct RegistrierungsFormular {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
}

fn leer_zu_none(wert: Option<String>) -> Option<String> {
    wert.filter(|s| !s.is_empty())
}

/// POST /register
pub async fn registrieren(
    State(state): State<AppState>,
    formular: Result<Form<RegistrierungsFormular>, FormRejection>,
) -> WebResult<Json<BenutzerAntwort>> {
    let Form(formular) = formular.map_err(|e| {
        state.metriken.registrierung(ergebnis::UNGUELTIG);
        WebError::UngueltigeEingabe(e.body_text())
    })?;

    let registrierung = Registrierung {
        email: formular.email.unwrap_or_default(),
        passwort: formular.password.unwrap_or_default(),
        name: leer_zu_none(formular.name),
        title: leer_zu_none(formular.title),
    };

    match state.auth.registrieren(registrierung).await {
        Ok(benutzer) => {
            state.metriken.registrierung(ergebnis::ERFOLG);
            Ok(Json(BenutzerAntwort::from(&benutzer)))
        }
        Err(e) => {
            let label = match &e {
                AuthError::UngueltigeEingabe(_) => ergebnis::UNGUELTIG,
                AuthError::EmailVergeben(_) => ergebnis::VERGEBEN,
                _ => ergebnis::FEHLER,
            };
            state.metriken.registrierung(label);
            tracing::info!(fehler = %e, "Registrierung abgelehnt");
            Err(e.into())
        }
    }
}

/// POST /login
///
/// Unbekannte E-Mail und falsches Passwort sind nach aussen nicht
/// unterscheidbar: beide fuehren zum Redirect auf das Fehlerziel.
pub async fn anmelden(
    State(state): State<AppState>,
    formular: Result<Form<LoginFormular>, FormRejection>,
) -> WebResult<Response> {
    let (email, passwort) = match formular {
        Ok(Form(LoginFormular {
            email: Some(email),
            password: Some(passwort),
        })) if !email.is_empty() && !passwort.is_empty() => (email, passwort),
        _ => {
            state.metriken.anmeldung(ergebnis::UNGUELTIG);
            tracing::debug!("Login ohne vollstaendige Anmeldedaten");
            return Ok(Redirect::to(&state.login_fehler_ziel).into_response());
        }
    };

    match state.auth.anmelden(&email, &passwort).await {
        Ok((benutzer, session)) => {
            state.metriken.anmeldung(ergebnis::ERFOLG);
            let cookie = session_cookie_setzen(&state.cookie, &session.token)?;
            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(BenutzerAntwort::from(&benutzer)),
            )
                .into_response())
        }
        Err(e) if e.ist_anmeldefehler() => {
            state.metriken.anmeldung(ergebnis::ABGELEHNT);
            tracing::debug!(grund = %e, "Login abgelehnt");
            Ok(Redirect::to(&state.login_fehler_ziel).into_response())
        }
        Err(e) => {
            state.metriken.anmeldung(ergebnis::FEHLER);
            Err(e.into())
        }
    }
}

/// POST /logout
pub async fn abmelden(State(state): State<AppState>, headers: HeaderMap) -> WebResult<Response> {
    if let Some(token) = state.session_token(&headers) {
        state.auth.abmelden(&token).await;
    }
    let cookie = session_cookie_loeschen(&state.cookie)?;
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}

/// GET /me – der Benutzer der aktuellen Session
pub async fn ich(State(state): State<AppState>, headers: HeaderMap) -> WebResult<Response> {
    let token = state.session_token(&headers).ok_or(WebError::NichtAngemeldet)?;

    match state.auth.session_validieren(&token).await {
        Ok(benutzer) => Ok(Json(BenutzerAntwort::from(&benutzer)).into_response()),
        Err(e) if e.ist_sessionfehler() => {
            let cookie = session_cookie_loeschen(&state.cookie)?;
            Ok((
                [(header::SET_COOKIE, cookie)],
                WebError::NichtAngemeldet,
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benutzer() -> BenutzerRecord {
        BenutzerRecord {
            id: Default::default(),
            email: "a@b.com".into(),
            password_hash: "$argon2id$geheim".into(),
            name: Some("Ada".into()),
            title: None,
            is_admin: false,
            created_at: Default::default(),
        }
    }

    #[test]
    fn antwort_enthaelt_keinen_hash() {
        let json = serde_json::to_value(BenutzerAntwort::from(&benutzer())).unwrap();
        let felder: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(felder.len(), 5);
        for feld in ["id", "email", "name", "title", "is_admin"] {
            assert!(felder.contains(&feld), "{feld} fehlt");
        }
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn leere_optionale_felder() {
        assert_eq!(leer_zu_none(Some(String::new())), None);
        assert_eq!(leer_zu_none(Some("x".into())), Some("x".into()));
    }
}
