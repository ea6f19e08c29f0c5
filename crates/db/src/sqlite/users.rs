//! SQLite-Implementierung des UserRepository

use uuid::Uuid;

use crate::error::DbError;
use crate::models::{jetzt, zeit_formatieren, BenutzerRecord, BenutzerUpdate, NeuerBenutzer};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_parsen, zeit_parsen};

const SPALTEN: &str = "id, email, hashed_password, is_chirpy_red, created_at, updated_at";

fn eindeutigkeit_pruefen(e: sqlx::Error, email: &str) -> DbError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("unique") {
        DbError::Eindeutigkeit(format!("E-Mail '{email}' bereits registriert"))
    } else {
        DbError::Sqlx(e)
    }
}

impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let id = Uuid::new_v4();
        let now = jetzt();
        let now_str = zeit_formatieren(now);

        sqlx::query(
            "INSERT INTO users (id, email, hashed_password, is_chirpy_red, created_at, updated_at)
             VALUES (?, ?, ?, 0, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.email)
        .bind(data.password_hash)
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(|e| eindeutigkeit_pruefen(e, data.email))?;

        Ok(BenutzerRecord {
            id,
            email: data.email.to_string(),
            password_hash: data.password_hash.to_string(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
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

    async fn update(&self, id: Uuid, data: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        // Dynamisches UPDATE – nur gesetzte Felder aendern
        let mut sets: Vec<&str> = vec!["updated_at = ?"];
        if data.email.is_some() {
            sets.push("email = ?");
        }
        if data.password_hash.is_some() {
            sets.push("hashed_password = ?");
        }

        let sql = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));
        let mut q = sqlx::query(&sql).bind(zeit_formatieren(jetzt()));

        if let Some(ref v) = data.email {
            q = q.bind(v);
        }
        if let Some(ref v) = data.password_hash {
            q = q.bind(v);
        }
        q = q.bind(id.to_string());

        let email = data.email.as_deref().unwrap_or_default();
        let affected = q
            .execute(&self.pool)
            .await
            .map_err(|e| eindeutigkeit_pruefen(e, email))?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {id}")));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::intern("User nach Update nicht gefunden"))
    }

    async fn upgrade(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
        let affected = sqlx::query("UPDATE users SET is_chirpy_red = 1, updated_at = ? WHERE id = ?")
            .bind(zeit_formatieren(jetzt()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete_all(&self) -> DbResult<u64> {
        // Chirps und Refresh-Tokens folgen per ON DELETE CASCADE
        let affected = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected)
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let is_chirpy_red: i64 = row.try_get("is_chirpy_red")?;

    Ok(BenutzerRecord {
        id: uuid_parsen(&id_str)?,
        email: row.try_get("email")?,
        password_hash: row.try_get("hashed_password")?,
        is_chirpy_red: is_chirpy_red != 0,
        created_at: zeit_parsen("created_at", &created_at)?,
        updated_at: zeit_parsen("updated_at", &updated_at)?,
    })
}
