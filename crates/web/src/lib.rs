//! # vorlage-web
//!
//! HTTP-Schnittstelle auf Basis von Axum:
//! - `POST /register`, `POST /login`, `POST /logout`, `GET /me`
//! - `GET /` als JSON-Begruessung
//! - statische Dateien aus dem oeffentlichen Verzeichnis als Fallback

pub mod error;
pub mod rest;

pub use error::{WebError, WebResult};
pub use rest::{AppState, CookieKonfig, RestServer, RestServerKonfig, Willkommen};
