//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. `PORT` und `DATABASE_URL` aus der Umgebung
//! ueberschreiben die Datei. Gelesen wird nur die Prozessumgebung, eine
//! `.env`-Datei wird nicht ausgewertet.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use vorlage_auth::session::MAX_TTL_SEKUNDEN;
use vorlage_observability::logging::{log_format_gueltig, log_level_gueltig};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerEinstellungen,
    pub netzwerk: NetzwerkEinstellungen,
    pub datenbank: DatenbankEinstellungen,
    /// Argon2-Arbeitsfaktor
    pub passwort: PasswortEinstellungen,
    pub session: SessionEinstellungen,
    /// Startseite und statische Dateien
    pub web: WebEinstellungen,
    pub logging: LoggingEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
    /// Administrator, der beim Start angelegt wird falls er fehlt
    pub admin: Option<AdminEinstellungen>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename, erscheint in den Logs
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Vorlage".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    pub bind_adresse: String,
    /// Port des HTTP-Servers (Umgebung: `PORT`)
    pub http_port: u16,
    /// CORS-Origins (leer = kein CORS)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            http_port: 8080,
            cors_origins: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL (Umgebung: `DATABASE_URL`)
    pub url: String,
    pub max_verbindungen: u32,
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://vorlage.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswortEinstellungen {
    pub speicher_kib: u32,
    pub iterationen: u32,
    pub parallelitaet: u32,
}

impl Default for PasswortEinstellungen {
    fn default() -> Self {
        use vorlage_auth::password::{
            STANDARD_ITERATIONEN, STANDARD_PARALLELITAET, STANDARD_SPEICHER_KIB,
        };
        Self {
            speicher_kib: STANDARD_SPEICHER_KIB,
            iterationen: STANDARD_ITERATIONEN,
            parallelitaet: STANDARD_PARALLELITAET,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionEinstellungen {
    pub cookie_name: String,
    /// `Secure`-Attribut setzen (hinter HTTPS aktivieren)
    pub cookie_secure: bool,
    pub ttl_sekunden: i64,
    /// Redirect-Ziel nach fehlgeschlagenem Login
    pub login_fehler_ziel: String,
}

impl Default for SessionEinstellungen {
    fn default() -> Self {
        Self {
            cookie_name: "vorlage.sid".into(),
            cookie_secure: false,
            ttl_sekunden: vorlage_auth::session::STANDARD_TTL_SEKUNDEN,
            login_fehler_ziel: "/".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebEinstellungen {
    /// Verzeichnis fuer statische Dateien (`None` = keine Auslieferung)
    pub public_dir: Option<PathBuf>,
    pub willkommen_titel: String,
    pub willkommen_nachricht: String,
}

impl Default for WebEinstellungen {
    fn default() -> Self {
        let willkommen = vorlage_web::Willkommen::default();
        Self {
            public_dir: Some(PathBuf::from("public")),
            willkommen_titel: willkommen.titel,
            willkommen_nachricht: willkommen.nachricht,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    pub aktiviert: bool,
    /// Port fuer Metriken und Health
    pub port: u16,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: true,
            port: 9300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminEinstellungen {
    pub email: String,
    pub passwort: String,
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei und wendet die
    /// Umgebungsvariablen an.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let mut config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str(&inhalt)
                .with_context(|| format!("Konfigurationsfehler in '{pfad}'"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Konfigurationsdatei '{pfad}' nicht lesbar"))
            }
        };

        config.umgebung_anwenden(|name| std::env::var(name).ok())?;
        config.validieren()?;
        Ok(config)
    }

    /// Uebernimmt `PORT` und `DATABASE_URL` aus der Umgebung
    pub fn umgebung_anwenden(
        &mut self,
        lesen: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(port) = lesen("PORT") {
            self.netzwerk.http_port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT '{port}' ist keine gueltige Portnummer"))?;
        }
        if let Some(url) = lesen("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.datenbank.url = url;
        }
        Ok(())
    }

    /// Prueft Werte die serde allein nicht abfangen kann
    pub fn validieren(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.logging.level) {
            bail!("Ungueltiger Log-Level '{}'", self.logging.level);
        }
        if !log_format_gueltig(&self.logging.format) {
            bail!("Ungueltiges Log-Format '{}'", self.logging.format);
        }
        if !(1..=MAX_TTL_SEKUNDEN).contains(&self.session.ttl_sekunden) {
            bail!(
                "session.ttl_sekunden muss zwischen 1 und {MAX_TTL_SEKUNDEN} liegen, ist {}",
                self.session.ttl_sekunden
            );
        }
        if self.session.cookie_name.is_empty()
            || self
                .session
                .cookie_name
                .contains(|c: char| matches!(c, ';' | '=' | ',') || c.is_whitespace())
        {
            bail!("Ungueltiger Cookie-Name '{}'", self.session.cookie_name);
        }
        if let Some(admin) = &self.admin {
            if admin.email.is_empty() || admin.passwort.is_empty() {
                bail!("[admin] braucht email und passwort");
            }
        }
        Ok(())
    }

    /// Bind-Adresse fuer den HTTP-Server
    pub fn http_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        self.bind_adresse(self.netzwerk.http_port)
    }

    /// Bind-Adresse fuer den Observability-Server
    pub fn observability_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        self.bind_adresse(self.observability.port)
    }

    fn bind_adresse(&self, port: u16) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.netzwerk.bind_adresse, port)
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{}'", self.netzwerk.bind_adresse))
    }
}
