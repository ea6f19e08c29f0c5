//! SQLite-Implementierung des ChirpRepository

use uuid::Uuid;

use crate::models::{jetzt, zeit_formatieren, ChirpFilter, ChirpRecord, NeuerChirp};
use crate::repository::{ChirpRepository, DbResult};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_parsen, zeit_parsen};

impl ChirpRepository for SqliteDb {
    async fn create(&self, data: NeuerChirp<'_>) -> DbResult<ChirpRecord> {
        let id = Uuid::new_v4();
        let now = jetzt();
        let now_str = zeit_formatieren(now);

        sqlx::query(
            "INSERT INTO chirps (id, body, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.body)
        .bind(data.user_id.to_string())
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await?;

        Ok(ChirpRecord {
            id,
            body: data.body.to_string(),
            user_id: data.user_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<ChirpRecord>> {
        let row = sqlx::query(
            "SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_chirp(&r)).transpose()
    }

    async fn list(&self, filter: ChirpFilter) -> DbResult<Vec<ChirpRecord>> {
        // rowid als Tiebreaker bei identischem Zeitstempel
        let richtung = filter.sortierung.als_sql();
        let rows = match filter.author_id {
            Some(author_id) => {
                let sql = format!(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps
                     WHERE user_id = ?
                     ORDER BY created_at {richtung}, rowid {richtung}"
                );
                sqlx::query(&sql)
                    .bind(author_id.to_string())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps
                     ORDER BY created_at {richtung}, rowid {richtung}"
                );
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.iter().map(row_to_chirp).collect()
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM chirps WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

fn row_to_chirp(row: &sqlx::sqlite::SqliteRow) -> DbResult<ChirpRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let user_str: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(ChirpRecord {
        id: uuid_parsen(&id_str)?,
        body: row.try_get("body")?,
        user_id: uuid_parsen(&user_str)?,
        created_at: zeit_parsen("created_at", &created_at)?,
        updated_at: zeit_parsen("updated_at", &updated_at)?,
    })
}
