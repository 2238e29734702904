//! SQLite-Implementierung des UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::QueryBuilder;
use vorlage_core::UserId;

use crate::error::{ist_unique_verletzung, DbError};
use crate::models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::{pool::SqliteDb, zeitpunkt_parsen};

const SPALTEN: &str = "id, email, password_hash, name, title, is_admin, created_at";

#[async_trait]
impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer) -> DbResult<BenutzerRecord> {
        let id = UserId::new();
        let now = Utc::now();

        // Kein vorheriges SELECT: der UNIQUE-Index entscheidet atomar
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, title, is_admin, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.name)
        .bind(&data.title)
        .bind(data.is_admin as i64)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if ist_unique_verletzung(&e) {
                DbError::Eindeutigkeit(format!("E-Mail '{}' bereits vergeben", data.email))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        tracing::debug!(user_id = %id, "Benutzer-Datensatz angelegt");

        Ok(BenutzerRecord {
            id,
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            title: data.title,
            is_admin: data.is_admin,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(&format!("SELECT {SPALTEN} FROM users WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(&format!("SELECT {SPALTEN} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn update(&self, id: UserId, data: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        if data.ist_leer() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::nicht_gefunden(format!("User {id}")));
        }

        // Dynamisches UPDATE – nur gesetzte Felder aendern
        let mut q = QueryBuilder::<sqlx::Sqlite>::new("UPDATE users SET ");
        let mut felder = q.separated(", ");
        if let Some(hash) = data.password_hash {
            felder.push("password_hash = ").push_bind_unseparated(hash);
        }
        if let Some(name) = data.name {
            felder.push("name = ").push_bind_unseparated(name);
        }
        if let Some(title) = data.title {
            felder.push("title = ").push_bind_unseparated(title);
        }
        if let Some(is_admin) = data.is_admin {
            felder.push("is_admin = ").push_bind_unseparated(is_admin as i64);
        }
        q.push(" WHERE id = ").push_bind(id.to_string());

        let affected = q.build().execute(&self.pool).await?.rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {id}")));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::intern("User nach Update nicht gefunden"))
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let id = id_str
        .parse::<UserId>()
        .map_err(|e| DbError::intern(format!("Ungueltige UUID '{id_str}': {e}")))?;

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = zeitpunkt_parsen("created_at", &created_at_str)?;

    let is_admin: i64 = row.try_get("is_admin")?;

    Ok(BenutzerRecord {
        id,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        name: row.try_get("name")?,
        title: row.try_get("title")?,
        is_admin: is_admin != 0,
        created_at,
    })
}
