//! SQLite-Pool fuer Vorlage
//!
//! Ein Pool pro Prozess. Fremdschluessel sind immer aktiv, die Migrationen
//! aus `migrations/` laufen beim Oeffnen.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::DbError;
use crate::repository::{DatabaseConfig, DbResult};

/// Geteilter Zugang zur SQLite-Datenbank, implementiert alle Repository-Traits
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Oeffnet (oder erstellt) die Datenbank aus der Konfiguration
    pub async fn oeffnen(config: &DatabaseConfig) -> DbResult<Self> {
        let journal = if config.sqlite_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        let verbindung = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(journal);

        let db = Self::verbinden(
            verbindung,
            SqlitePoolOptions::new().max_connections(config.max_verbindungen),
        )
        .await?;

        tracing::info!(
            url = %config.url,
            wal = config.sqlite_wal,
            max_verbindungen = config.max_verbindungen,
            "Datenbank bereit"
        );
        Ok(db)
    }

    /// Fluechtige Datenbank im Speicher
    ///
    /// Genau eine Verbindung, die nie geschlossen wird: jede neue
    /// `:memory:`-Verbindung saehe eine leere Datenbank.
    pub async fn in_memory() -> DbResult<Self> {
        Self::verbinden(
            SqliteConnectOptions::from_str("sqlite::memory:")?,
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        )
        .await
    }

    async fn verbinden(
        verbindung: SqliteConnectOptions,
        pool: SqlitePoolOptions,
    ) -> DbResult<Self> {
        let pool = pool.connect_with(verbindung.foreign_keys(true)).await?;
        let db = Self { pool };
        db.migrieren().await?;
        Ok(db)
    }

    async fn migrieren(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(DbError::from)?;
        tracing::debug!("Migrationen angewendet");
        Ok(())
    }

    /// `true` wenn eine einfache Abfrage durchgeht (Health-Check)
    pub async fn ping(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(fehler = %e, "Datenbank-Ping fehlgeschlagen");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_ist_migriert_und_erreichbar() {
        let db = SqliteDb::in_memory().await.unwrap();
        assert!(db.ping().await);

        let tabellen: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
                .fetch_all(&db.pool)
                .await
                .unwrap();
        assert!(tabellen.iter().any(|t| t == "users"));
        assert!(tabellen.iter().any(|t| t == "posts"));
    }

    #[tokio::test]
    async fn ping_nach_schliessen_schlaegt_fehl() {
        let db = SqliteDb::in_memory().await.unwrap();
        db.pool.close().await;
        assert!(!db.ping().await);
    }
}
