//! SQLite-Implementierung des PostRepository

use async_trait::async_trait;
use chrono::Utc;
use vorlage_core::{PostId, UserId};

use crate::error::DbError;
use crate::models::{BeitragRecord, NeuerBeitrag};
use crate::repository::{DbResult, PostRepository};
use crate::sqlite::{pool::SqliteDb, zeitpunkt_parsen};

#[async_trait]
impl PostRepository for SqliteDb {
    async fn create(&self, data: NeuerBeitrag) -> DbResult<BeitragRecord> {
        let id = PostId::new();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO posts (id, title, body, author_id, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&data.title)
        .bind(&data.body)
        .bind(data.author_id.map(|a| a.to_string()))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(BeitragRecord {
            id,
            title: data.title,
            body: data.body,
            author_id: data.author_id,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: PostId) -> DbResult<Option<BeitragRecord>> {
        let row = sqlx::query(
            "SELECT id, title, body, author_id, created_at FROM posts WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_beitrag(&r)).transpose()
    }

    async fn list_by_author(&self, author_id: UserId) -> DbResult<Vec<BeitragRecord>> {
        let rows = sqlx::query(
            "SELECT id, title, body, author_id, created_at FROM posts
             WHERE author_id = ? ORDER BY created_at DESC",
        )
        .bind(author_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_beitrag).collect()
    }
}

fn row_to_beitrag(row: &sqlx::sqlite::SqliteRow) -> DbResult<BeitragRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let id = id_str
        .parse::<PostId>()
        .map_err(|e| DbError::intern(format!("Ungueltige UUID '{id_str}': {e}")))?;

    let author_id: Option<String> = row.try_get("author_id")?;
    let author_id = author_id
        .as_deref()
        .map(|s| {
            s.parse::<UserId>()
                .map_err(|e| DbError::intern(format!("Ungueltige author_id '{s}': {e}")))
        })
        .transpose()?;

    let created_at_str: String = row.try_get("created_at")?;

    Ok(BeitragRecord {
        id,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        author_id,
        created_at: zeitpunkt_parsen("created_at", &created_at_str)?,
    })
}
