//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod pool;
pub mod posts;
pub mod users;

pub use pool::SqliteDb;

use chrono::{DateTime, Utc};

use crate::error::DbError;
use crate::repository::DbResult;

/// Parst einen RFC3339-Zeitstempel aus einer Textspalte
pub(crate) fn zeitpunkt_parsen(spalte: &str, wert: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(wert)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltige {spalte} '{wert}': {e}")))
}
