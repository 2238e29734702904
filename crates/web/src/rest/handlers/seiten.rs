//! Startseite

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::rest::AppState;

#[derive(Debug, Serialize)]
pub struct IndexAntwort {
    pub title: String,
    pub message: String,
}

/// GET / – Begruessung als JSON
pub async fn index(State(state): State<AppState>) -> Json<IndexAntwort> {
    Json(IndexAntwort {
        title: state.willkommen.titel.clone(),
        message: state.willkommen.nachricht.clone(),
    })
}
