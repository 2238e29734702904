//! Cookie-Handling und Fehlerantworten fuer die REST-API

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::{WebError, WebResult};
use crate::rest::CookieKonfig;

/// Fehlerantwort fuer die REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// Liest ein Cookie aus allen `Cookie`-Headern der Anfrage
pub fn cookie_lesen(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|teil| teil.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

fn attribute(konfig: &CookieKonfig) -> &'static str {
    if konfig.secure {
        "HttpOnly; Secure; SameSite=Lax; Path=/"
    } else {
        "HttpOnly; SameSite=Lax; Path=/"
    }
}

/// `Set-Cookie`-Wert fuer eine neue Session
pub fn session_cookie_setzen(konfig: &CookieKonfig, token: &str) -> WebResult<HeaderValue> {
    HeaderValue::from_str(&format!("{}={}; {}", konfig.name, token, attribute(konfig)))
        .map_err(|e| WebError::Intern(format!("Ungueltiger Cookie-Wert: {e}")))
}

/// `Set-Cookie`-Wert der das Session-Cookie im Browser loescht
pub fn session_cookie_loeschen(konfig: &CookieKonfig) -> WebResult<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; {}",
        konfig.name,
        attribute(konfig)
    ))
    .map_err(|e| WebError::Intern(format!("Ungueltiger Cookie-Wert: {e}")))
}
