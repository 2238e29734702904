//! Route-Definitionen

use axum::{
    routing::{get, post},
    Router,
};

use crate::rest::{handlers, AppState};

/// Erstellt den Router mit allen Endpunkten
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::seiten::index))
        // Benutzer
        .route("/register", post(handlers::benutzer::registrieren))
        .route("/login", post(handlers::benutzer::anmelden))
        .route("/logout", post(handlers::benutzer::abmelden))
        .route("/me", get(handlers::benutzer::ich))
}
