// SQLite-backed record store.
//
// Tables (created by whoever owns the database, see schema.sql):
// - warns: Moderation warnings, ids scoped per (user_id, server_id)
// - disabled_commands: Marker rows for commands switched off per server
// - disabled_cogs: Marker rows for cogs switched off per server
// - prefixes: One command prefix per server
//
// Every write is a single auto-committed statement. The pool is handed in by
// the caller, who also owns its lifetime.

use crate::core::records::{PrefixStore, RecordError, Toggle, ToggleStore, WarnStore, Warning};
use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

/// Statements for one marker-row family.
struct ToggleQueries {
    exists: &'static str,
    insert: &'static str,
    delete: &'static str,
    list: &'static str,
}

const COMMAND_QUERIES: ToggleQueries = ToggleQueries {
    exists: "SELECT COUNT(*) FROM disabled_commands WHERE server_id = ? AND command = ?",
    insert: r#"
        INSERT INTO disabled_commands (server_id, command)
        SELECT ?1, ?2
        WHERE NOT EXISTS (
            SELECT 1 FROM disabled_commands WHERE server_id = ?1 AND command = ?2
        )
    "#,
    delete: "DELETE FROM disabled_commands WHERE server_id = ? AND command = ?",
    list: "SELECT command FROM disabled_commands WHERE server_id = ? ORDER BY rowid",
};

const COG_QUERIES: ToggleQueries = ToggleQueries {
    exists: "SELECT COUNT(*) FROM disabled_cogs WHERE server_id = ? AND cog = ?",
    insert: r#"
        INSERT INTO disabled_cogs (server_id, cog)
        SELECT ?1, ?2
        WHERE NOT EXISTS (
            SELECT 1 FROM disabled_cogs WHERE server_id = ?1 AND cog = ?2
        )
    "#,
    delete: "DELETE FROM disabled_cogs WHERE server_id = ? AND cog = ?",
    list: "SELECT cog FROM disabled_cogs WHERE server_id = ? ORDER BY rowid",
};

/// Narrow an INTEGER column to `u32`, failing instead of wrapping.
fn to_u32(value: i64, what: &str) -> Result<u32, RecordError> {
    u32::try_from(value)
        .map_err(|_| RecordError::OutOfRange(format!("{what} {value} does not fit in u32")))
}

fn queries(kind: Toggle) -> &'static ToggleQueries {
    match kind {
        Toggle::Command => &COMMAND_QUERIES,
        Toggle::Cog => &COG_QUERIES,
    }
}

pub struct SqliteRecordStore {
    pool: Pool<Sqlite>,
}

impl SqliteRecordStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl WarnStore for SqliteRecordStore {
    async fn add_warn(
        &self,
        user_id: u64,
        server_id: u64,
        moderator_id: u64,
        reason: &str,
    ) -> Result<u32, RecordError> {
        // Next id and insert in one statement so concurrent warns in the same
        // scope can't both read the same max.
        let warn_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO warns (id, user_id, server_id, moderator_id, reason)
            SELECT COALESCE(MAX(id), 0) + 1, ?1, ?2, ?3, ?4
            FROM warns
            WHERE user_id = ?1 AND server_id = ?2
            RETURNING id
            "#,
        )
        .bind(user_id as i64)
        .bind(server_id as i64)
        .bind(moderator_id as i64)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id, server_id, moderator_id, warn_id, "Added warning");
        to_u32(warn_id, "warn id")
    }

    async fn remove_warn(
        &self,
        warn_id: u32,
        user_id: u64,
        server_id: u64,
    ) -> Result<u32, RecordError> {
        let deleted = sqlx::query("DELETE FROM warns WHERE id = ? AND user_id = ? AND server_id = ?")
            .bind(warn_id as i64)
            .bind(user_id as i64)
            .bind(server_id as i64)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM warns WHERE user_id = ? AND server_id = ?")
                .bind(user_id as i64)
                .bind(server_id as i64)
                .fetch_one(&self.pool)
                .await?;

        tracing::debug!(user_id, server_id, warn_id, deleted, remaining, "Removed warning");
        to_u32(remaining, "warning count")
    }

    async fn get_warnings(&self, user_id: u64, server_id: u64) -> Result<Vec<Warning>, RecordError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, server_id, moderator_id, reason,
                   CAST(strftime('%s', created_at) AS INTEGER) AS created_at, id
            FROM warns
            WHERE user_id = ? AND server_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(user_id as i64)
        .bind(server_id as i64)
        .fetch_all(&self.pool)
        .await?;

        // The warns table declares no NOT NULL columns; NULL id, moderator
        // and created_at read as 0, NULL reason as "".
        let mut warnings = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.get::<Option<i64>, _>("id").unwrap_or(0);
            warnings.push(Warning {
                id: to_u32(id, "warn id")?,
                user_id,
                server_id,
                moderator_id: row.get::<Option<i64>, _>("moderator_id").unwrap_or(0) as u64,
                reason: row.get::<Option<String>, _>("reason").unwrap_or_default(),
                created_at: row.get::<Option<i64>, _>("created_at").unwrap_or(0),
            });
        }

        Ok(warnings)
    }
}

#[async_trait]
impl ToggleStore for SqliteRecordStore {
    async fn is_disabled(&self, kind: Toggle, server_id: u64, name: &str) -> Result<bool, RecordError> {
        let count: i64 = sqlx::query_scalar(queries(kind).exists)
            .bind(server_id as i64)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn disable(&self, kind: Toggle, server_id: u64, name: &str) -> Result<(), RecordError> {
        let inserted = sqlx::query(queries(kind).insert)
            .bind(server_id as i64)
            .bind(name)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!(%kind, server_id, name, inserted, "Disabled");
        Ok(())
    }

    async fn enable(&self, kind: Toggle, server_id: u64, name: &str) -> Result<(), RecordError> {
        let deleted = sqlx::query(queries(kind).delete)
            .bind(server_id as i64)
            .bind(name)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!(%kind, server_id, name, deleted, "Enabled");
        Ok(())
    }

    async fn list_disabled(&self, kind: Toggle, server_id: u64) -> Result<Vec<String>, RecordError> {
        let names = sqlx::query_scalar(queries(kind).list)
            .bind(server_id as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }
}

#[async_trait]
impl PrefixStore for SqliteRecordStore {
    async fn set_prefix(&self, server_id: u64, prefix: &str) -> Result<(), RecordError> {
        sqlx::query(
            r#"
            INSERT INTO prefixes (server_id, prefix)
            VALUES (?, ?)
            ON CONFLICT(server_id) DO UPDATE SET
                prefix = excluded.prefix
            "#,
        )
        .bind(server_id as i64)
        .bind(prefix)
        .execute(&self.pool)
        .await?;

        tracing::debug!(server_id, prefix, "Set prefix");
        Ok(())
    }

    async fn get_prefix(&self, server_id: u64) -> Result<Option<String>, RecordError> {
        let prefix = sqlx::query_scalar("SELECT prefix FROM prefixes WHERE server_id = ?")
            .bind(server_id as i64)
            .fetch_optional(&self.pool)
            .await?;
        Ok(prefix)
    }
}
