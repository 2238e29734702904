//! vorlage-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Auth-Service, HTTP- und Observability-Server.
//! Alle Abhaengigkeiten werden hier explizit erzeugt und weitergereicht.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::ServerConfig;
use vorlage_auth::{AuthService, PasswortHasher, SessionStore};
use vorlage_db::{DatabaseConfig, SqliteDb};
use vorlage_observability::{HealthState, VorlageMetrics};
use vorlage_web::{AppState, CookieKonfig, RestServer, RestServerKonfig, Willkommen};

/// Intervall fuer den DB-Ping des Health-Checks
const DB_PING_INTERVALL: Duration = Duration::from_secs(30);

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen und migrieren
    /// 2. Auth-Service aufbauen, Administrator sicherstellen
    /// 3. Observability-Server starten
    /// 4. HTTP-Server starten
    /// 5. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let config = &self.config;
        tracing::info!(
            server_name = %config.server.name,
            http = %config.http_bind_adresse()?,
            "Server startet"
        );

        let db = Arc::new(
            SqliteDb::oeffnen(&DatabaseConfig {
                url: config.datenbank.url.clone(),
                max_verbindungen: config.datenbank.max_verbindungen,
                sqlite_wal: config.datenbank.sqlite_wal,
            })
            .await
            .context("Datenbank konnte nicht geoeffnet werden")?,
        );

        let auth = Arc::new(auth_service(config, db.clone())?);
        if let Some(admin) = &config.admin {
            auth.admin_sicherstellen(&admin.email, &admin.passwort)
                .await
                .context("Administrator konnte nicht angelegt werden")?;
        }

        let metriken = VorlageMetrics::neu()?;
        let health = HealthState::neu();
        db_ping_starten(db, health.clone());

        if config.observability.aktiviert {
            let addr = config.observability_bind_adresse()?;
            let metriken = metriken.clone();
            tokio::spawn(async move {
                if let Err(e) =
                    vorlage_observability::observability_server_starten(addr, metriken, health)
                        .await
                {
                    tracing::error!("Observability-Server beendet: {e:#}");
                }
            });
        }

        let state = app_state(config, auth, metriken);
        let rest = RestServer::neu(RestServerKonfig {
            bind_addr: config.http_bind_adresse()?,
            cors_origins: config.netzwerk.cors_origins.clone(),
            public_dir: config.web.public_dir.clone(),
        });

        tokio::select! {
            ergebnis = rest.starten(state) => {
                ergebnis.context("HTTP-Server beendet")?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            }
        }

        Ok(())
    }
}

/// Baut den Auth-Service mit Hasher und Session-Store aus der Konfiguration
pub fn auth_service(config: &ServerConfig, db: Arc<SqliteDb>) -> Result<AuthService> {
    let hasher = PasswortHasher::mit_parametern(
        config.passwort.speicher_kib,
        config.passwort.iterationen,
        config.passwort.parallelitaet,
    )
    .context("Ungueltige Argon2-Parameter in [passwort]")?;

    let store = SessionStore::mit_ttl(config.session.ttl_sekunden)
        .context("Ungueltige Session-Lebensdauer in [session]")?;
    let sessions = SessionStore::cleanup_starten(Arc::new(store));

    Ok(AuthService::neu(db, hasher, sessions))
}

/// Baut den Axum-State aus Konfiguration und Services
pub fn app_state(config: &ServerConfig, auth: Arc<AuthService>, metriken: VorlageMetrics) -> AppState {
    AppState {
        cookie: CookieKonfig {
            name: config.session.cookie_name.clone(),
            secure: config.session.cookie_secure,
        },
        willkommen: Willkommen {
            titel: config.web.willkommen_titel.clone(),
            nachricht: config.web.willkommen_nachricht.clone(),
        },
        login_fehler_ziel: config.session.login_fehler_ziel.clone(),
        ..AppState::neu(auth, metriken)
    }
}

fn db_ping_starten(db: Arc<SqliteDb>, health: HealthState) {
    tokio::spawn(async move {
        let mut intervall = tokio::time::interval(DB_PING_INTERVALL);
        loop {
            intervall.tick().await;
            health.db_status_setzen(db.ping().await);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswortEinstellungen;

    fn test_config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.passwort = PasswortEinstellungen {
            speicher_kib: 8,
            iterationen: 1,
            parallelitaet: 1,
        };
        config.session.cookie_name = "test.sid".into();
        config.session.login_fehler_ziel = "/anmelden".into();
        config
    }

    #[tokio::test]
    async fn app_state_uebernimmt_konfiguration() {
        let config = test_config();
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        let auth = Arc::new(auth_service(&config, db).unwrap());

        let state = app_state(&config, auth, VorlageMetrics::neu().unwrap());
        assert_eq!(state.cookie.name, "test.sid");
        assert!(!state.cookie.secure);
        assert_eq!(state.login_fehler_ziel, "/anmelden");
    }

    #[tokio::test]
    async fn ungueltige_argon2_parameter() {
        let mut config = test_config();
        config.passwort.speicher_kib = 0;
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        assert!(auth_service(&config, db).is_err());
    }

    #[tokio::test]
    async fn ueberlange_session_ttl_bricht_start_ab() {
        let mut config = test_config();
        config.session.ttl_sekunden = 10_000_000_000_000;
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        assert!(auth_service(&config, db).is_err());
    }

    #[tokio::test]
    async fn admin_bootstrap_ist_idempotent() {
        let config = test_config();
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        let auth = auth_service(&config, db).unwrap();

        assert!(auth.admin_sicherstellen("admin@example.com", "root").await.unwrap());
        assert!(!auth.admin_sicherstellen("admin@example.com", "root").await.unwrap());

        let admin = auth.authentifizieren("admin@example.com", "root").await.unwrap();
        assert!(admin.is_admin);
    }
}
