//! Axum HTTP-Server fuer Vorlage

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use vorlage_observability::{request_trace_layer, timing_middleware};

use crate::rest::{routes::router, AppState};

/// REST-Server-Konfiguration
#[derive(Debug, Clone)]
pub struct RestServerKonfig {
    pub bind_addr: SocketAddr,
    /// Erlaubte CORS-Origins. Leer = kein CORS-Layer (nur gleiche Origin).
    pub cors_origins: Vec<String>,
    /// Verzeichnis mit statischen Dateien, `None` = keine Auslieferung
    pub public_dir: Option<PathBuf>,
}

impl Default for RestServerKonfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origins: vec![],
            public_dir: None,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_credentials(true)
}

/// Baut die vollstaendige Anwendung inklusive Layern
pub fn app(state: AppState, konfig: &RestServerKonfig) -> Router {
    let mut routen = router();
    if let Some(dir) = &konfig.public_dir {
        routen = routen.fallback_service(ServeDir::new(dir));
    }

    let mut app = routen
        .layer(middleware::from_fn_with_state(
            state.metriken.clone(),
            timing_middleware,
        ))
        .layer(request_trace_layer())
        .with_state(state);

    if !konfig.cors_origins.is_empty() {
        app = app.layer(cors_layer(&konfig.cors_origins));
    }
    app
}

/// Axum HTTP-Server fuer Vorlage
pub struct RestServer {
    konfig: RestServerKonfig,
}

impl RestServer {
    pub fn neu(konfig: RestServerKonfig) -> Self {
        Self { konfig }
    }

    /// Startet den Server und laeuft bis der Listener geschlossen wird
    pub async fn starten(self, state: AppState) -> Result<()> {
        let app = app(state, &self.konfig);

        let listener = tokio::net::TcpListener::bind(self.konfig.bind_addr).await?;
        tracing::info!(
            addr = %self.konfig.bind_addr,
            public_dir = ?self.konfig.public_dir,
            "HTTP-Server gestartet"
        );

        axum::serve(listener, app).await?;
        Ok(())
    }
}
