//! Structured Logging Setup via tracing-subscriber
//!
//! Umgebungsvariablen haben Vorrang vor der Konfigurationsdatei:
//! - `VORLAGE_LOG_LEVEL`: Filter-Ausdruck (z.B. `info` oder `vorlage_web=debug`)
//! - `VORLAGE_LOG_FORMAT`: `text` oder `json`

use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "VORLAGE_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "VORLAGE_LOG_FORMAT";

/// Initialisiert das Logging-System einmalig fuer den Prozess.
///
/// `level` und `format` stammen aus der Konfiguration und werden nur
/// verwendet, wenn die Umgebung nichts vorgibt.
pub fn logging_initialisieren(level: &str, format: &str) {
    let filter = EnvFilter::try_from_env(ENV_LOG_LEVEL)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = effektives_format(std::env::var(ENV_LOG_FORMAT).ok(), format);

    if format == "json" {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }
}

/// Waehlt das Log-Format: gueltiger Umgebungswert vor Konfiguration, sonst `text`
pub fn effektives_format(aus_env: Option<String>, aus_config: &str) -> String {
    aus_env
        .filter(|f| log_format_gueltig(f))
        .or_else(|| Some(aus_config.to_string()).filter(|f| log_format_gueltig(f)))
        .unwrap_or_else(|| "text".to_string())
}

/// Validiert ob ein Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

/// Validiert ob ein Log-Format-String gueltig ist.
pub fn log_format_gueltig(format: &str) -> bool {
    matches!(format, "text" | "json")
}
