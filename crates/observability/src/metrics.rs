//! Prometheus-kompatible Metriken fuer Vorlage
//!
//! Registrierte Metriken:
//! - `vorlage_anmeldungen_total` – Counter: Login-Versuche (ergebnis)
//! - `vorlage_registrierungen_total` – Counter: Registrierungen (ergebnis)
//! - `vorlage_http_requests_total` – Counter: HTTP-Anfragen (method, path, status)
//! - `vorlage_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Ergebnis-Label fuer Auth-Zaehler
pub mod ergebnis {
    pub const ERFOLG: &str = "erfolg";
    pub const ABGELEHNT: &str = "abgelehnt";
    pub const UNGUELTIG: &str = "ungueltig";
    pub const VERGEBEN: &str = "vergeben";
    pub const FEHLER: &str = "fehler";
}

/// Alle Vorlage-Prometheus-Metriken
#[derive(Clone)]
pub struct VorlageMetrics {
    pub registry: Arc<Registry>,

    // Auth-Metriken
    pub anmeldungen_total: IntCounterVec,
    pub registrierungen_total: IntCounterVec,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl VorlageMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        let anmeldungen_total = IntCounterVec::new(
            Opts::new("vorlage_anmeldungen_total", "Login-Versuche nach Ergebnis"),
            &["ergebnis"],
        )?;
        registry.register(Box::new(anmeldungen_total.clone()))?;

        let registrierungen_total = IntCounterVec::new(
            Opts::new("vorlage_registrierungen_total", "Registrierungen nach Ergebnis"),
            &["ergebnis"],
        )?;
        registry.register(Box::new(registrierungen_total.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("vorlage_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "vorlage_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            // Argon2 macht Login und Registrierung absichtlich langsam
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            anmeldungen_total,
            registrierungen_total,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Zaehlt einen Login-Versuch
    pub fn anmeldung(&self, ergebnis: &str) {
        self.anmeldungen_total.with_label_values(&[ergebnis]).inc();
    }

    /// Zaehlt einen Registrierungsversuch
    pub fn registrierung(&self, ergebnis: &str) {
        self.registrierungen_total.with_label_values(&[ergebnis]).inc();
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: VorlageMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<VorlageMetrics>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_zaehler_mit_ergebnis() {
        let metriken = VorlageMetrics::neu().unwrap();
        metriken.anmeldung(ergebnis::ERFOLG);
        metriken.anmeldung(ergebnis::ABGELEHNT);
        metriken.anmeldung(ergebnis::ABGELEHNT);
        metriken.registrierung(ergebnis::VERGEBEN);

        let abgelehnt = metriken
            .anmeldungen_total
            .with_label_values(&[ergebnis::ABGELEHNT])
            .get();
        assert_eq!(abgelehnt, 2);
        assert_eq!(
            metriken
                .registrierungen_total
                .with_label_values(&[ergebnis::VERGEBEN])
                .get(),
            1
        );
    }

    #[test]
    fn getrennte_registries() {
        let a = VorlageMetrics::neu().unwrap();
        let b = VorlageMetrics::neu().unwrap();
        a.anmeldung(ergebnis::ERFOLG);
        assert_eq!(b.anmeldungen_total.with_label_values(&[ergebnis::ERFOLG]).get(), 0);
    }

    #[test]
    fn export_prometheus_format() {
        let metriken = VorlageMetrics::neu().unwrap();
        metriken.registrierung(ergebnis::ERFOLG);
        metriken
            .http_request_duration_seconds
            .with_label_values(&["POST", "/register"])
            .observe(0.3);

        let output = metriken.exportieren().unwrap();
        assert!(output.contains("vorlage_registrierungen_total{ergebnis=\"erfolg\"} 1"));
        assert!(output.contains("vorlage_http_request_duration_seconds"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }
}
