// Record store implementations.

mod in_memory;
mod sqlite_record_store;

pub use in_memory::InMemoryRecordStore;
pub use sqlite_record_store::SqliteRecordStore;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::RecordStore;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    /// Runs the warn, toggle and prefix scenario through the façade only,
    /// so both implementations are held to the same behaviour.
    async fn exercise<S: RecordStore>(store: &S) {
        assert_eq!(store.add_warn(42, 100, 7, "spam").await.unwrap(), 1);
        assert_eq!(store.add_warn(42, 100, 7, "spam again").await.unwrap(), 2);
        let ids: Vec<u32> = store
            .get_warnings(42, 100)
            .await
            .unwrap()
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.remove_warn(1, 42, 100).await.unwrap(), 1);
        let remaining = store.get_warnings(42, 100).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);

        store.disable_command(100, "ban").await.unwrap();
        store.disable_command(100, "ban").await.unwrap();
        assert!(!store.is_command_enabled(100, "ban").await.unwrap());
        assert_eq!(store.get_disabled_commands(100).await.unwrap(), vec!["ban"]);
        store.enable_command(100, "ban").await.unwrap();
        assert!(store.is_command_enabled(100, "ban").await.unwrap());

        store.disable_cog(100, "fun").await.unwrap();
        assert!(store.is_cog_disabled(100, "fun").await.unwrap());
        assert_eq!(store.get_disabled_cogs(100).await.unwrap(), vec!["fun"]);

        assert_eq!(store.get_prefix(100).await.unwrap(), None);
        store.set_prefix(100, "!!").await.unwrap();
        store.set_prefix(100, "?").await.unwrap();
        assert_eq!(store.get_prefix(100).await.unwrap().as_deref(), Some("?"));
    }

    #[tokio::test]
    async fn test_in_memory_store_through_facade() {
        exercise(&InMemoryRecordStore::new()).await;
    }

    #[tokio::test]
    async fn test_sqlite_store_through_facade() {
        let dir = TempDir::new().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("records.db"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::raw_sql(include_str!("../../../schema.sql"))
            .execute(&pool)
            .await
            .unwrap();

        exercise(&SqliteRecordStore::new(pool)).await;
    }
}
