//! SQLite-Implementierung des RefreshTokenRepository
//!
//! Tokens werden nie geloescht, nur ueber `revoked_at` als widerrufen markiert.

use chrono::{DateTime, Utc};

use crate::models::{
    zeit_formatieren, zeit_kuerzen, NeuerRefreshToken, RefreshTokenRecord, WiderrufErgebnis,
};
use crate::repository::{DbResult, RefreshTokenRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{uuid_parsen, zeit_parsen};

impl RefreshTokenRepository for SqliteDb {
    async fn create(&self, data: NeuerRefreshToken<'_>) -> DbResult<RefreshTokenRecord> {
        let created_at = zeit_kuerzen(data.created_at);
        let expires_at = zeit_kuerzen(data.expires_at);
        let created_str = zeit_formatieren(created_at);

        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at)
             VALUES (?, ?, ?, ?, ?, NULL)",
        )
        .bind(data.token)
        .bind(data.user_id.to_string())
        .bind(&created_str)
        .bind(&created_str)
        .bind(zeit_formatieren(expires_at))
        .execute(&self.pool)
        .await?;

        Ok(RefreshTokenRecord {
            token: data.token.to_string(),
            user_id: data.user_id,
            created_at,
            updated_at: created_at,
            expires_at,
            revoked_at: None,
        })
    }

    async fn get(&self, token: &str) -> DbResult<Option<RefreshTokenRecord>> {
        let row = sqlx::query(
            "SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
             FROM refresh_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_token(&r)).transpose()
    }

    async fn revoke(&self, token: &str, zeitpunkt: DateTime<Utc>) -> DbResult<WiderrufErgebnis> {
        let zeit_str = zeit_formatieren(zeitpunkt);

        // Bedingtes UPDATE: ein Resolve sieht entweder den alten oder den neuen Zustand
        let affected = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = ?, updated_at = ?
             WHERE token = ? AND revoked_at IS NULL",
        )
        .bind(&zeit_str)
        .bind(&zeit_str)
        .bind(token)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected > 0 {
            return Ok(WiderrufErgebnis::Widerrufen);
        }

        let vorhanden: Option<(String,)> =
            sqlx::query_as("SELECT token FROM refresh_tokens WHERE token = ?")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(match vorhanden {
            Some(_) => WiderrufErgebnis::BereitsWiderrufen,
            None => WiderrufErgebnis::NichtGefunden,
        })
    }
}

fn row_to_token(row: &sqlx::sqlite::SqliteRow) -> DbResult<RefreshTokenRecord> {
    use sqlx::Row as _;

    let user_str: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let expires_at: String = row.try_get("expires_at")?;
    let revoked_at: Option<String> = row.try_get("revoked_at")?;

    Ok(RefreshTokenRecord {
        token: row.try_get("token")?,
        user_id: uuid_parsen(&user_str)?,
        created_at: zeit_parsen("created_at", &created_at)?,
        updated_at: zeit_parsen("updated_at", &updated_at)?,
        expires_at: zeit_parsen("expires_at", &expires_at)?,
        revoked_at: revoked_at
            .as_deref()
            .map(|s| zeit_parsen("revoked_at", s))
            .transpose()?,
    })
}
