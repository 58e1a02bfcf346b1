// In-memory implementation of the record ports.
//
// Same semantics as the SQLite store: per-scope max+1 warning ids,
// insertion order, idempotent markers, one prefix per server.
// Nothing survives a restart, so this is for tests and throwaway setups.

use crate::core::records::{PrefixStore, RecordError, Toggle, ToggleStore, WarnStore, Warning};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

/// The warn scope: warning ids are unique only inside one of these.
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
struct WarnScope {
    user_id: u64,
    server_id: u64,
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    warnings: DashMap<WarnScope, Vec<Warning>>,
    /// (kind, server_id) -> disabled names in insertion order
    disabled: DashMap<(Toggle, u64), Vec<String>>,
    prefixes: DashMap<u64, String>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WarnStore for InMemoryRecordStore {
    async fn add_warn(
        &self,
        user_id: u64,
        server_id: u64,
        moderator_id: u64,
        reason: &str,
    ) -> Result<u32, RecordError> {
        // Holding the entry guard makes next-id and push one step
        let mut scope = self
            .warnings
            .entry(WarnScope { user_id, server_id })
            .or_default();
        let id = scope.iter().map(|w| w.id).max().unwrap_or(0) + 1;

        scope.push(Warning {
            id,
            user_id,
            server_id,
            moderator_id,
            reason: reason.to_string(),
            created_at: Utc::now().timestamp(),
        });
        Ok(id)
    }

    async fn remove_warn(
        &self,
        warn_id: u32,
        user_id: u64,
        server_id: u64,
    ) -> Result<u32, RecordError> {
        let key = WarnScope { user_id, server_id };
        match self.warnings.get_mut(&key) {
            Some(mut scope) => {
                scope.retain(|w| w.id != warn_id);
                Ok(scope.len() as u32)
            }
            None => Ok(0),
        }
    }

    async fn get_warnings(&self, user_id: u64, server_id: u64) -> Result<Vec<Warning>, RecordError> {
        Ok(self
            .warnings
            .get(&WarnScope { user_id, server_id })
            .map(|scope| scope.value().clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ToggleStore for InMemoryRecordStore {
    async fn is_disabled(&self, kind: Toggle, server_id: u64, name: &str) -> Result<bool, RecordError> {
        Ok(self
            .disabled
            .get(&(kind, server_id))
            .is_some_and(|names| names.iter().any(|n| n == name)))
    }

    async fn disable(&self, kind: Toggle, server_id: u64, name: &str) -> Result<(), RecordError> {
        let mut names = self.disabled.entry((kind, server_id)).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        Ok(())
    }

    async fn enable(&self, kind: Toggle, server_id: u64, name: &str) -> Result<(), RecordError> {
        if let Some(mut names) = self.disabled.get_mut(&(kind, server_id)) {
            names.retain(|n| n != name);
        }
        Ok(())
    }

    async fn list_disabled(&self, kind: Toggle, server_id: u64) -> Result<Vec<String>, RecordError> {
        Ok(self
            .disabled
            .get(&(kind, server_id))
            .map(|names| names.value().clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl PrefixStore for InMemoryRecordStore {
    async fn set_prefix(&self, server_id: u64, prefix: &str) -> Result<(), RecordError> {
        self.prefixes.insert(server_id, prefix.to_string());
        Ok(())
    }

    async fn get_prefix(&self, server_id: u64) -> Result<Option<String>, RecordError> {
        Ok(self.prefixes.get(&server_id).map(|p| p.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_warn_ids_scoped_per_user_and_server() {
        let store = InMemoryRecordStore::new();

        assert_eq!(store.add_warn(42, 100, 7, "spam").await.unwrap(), 1);
        assert_eq!(store.add_warn(42, 100, 7, "spam again").await.unwrap(), 2);
        // Different user, same server
        assert_eq!(store.add_warn(43, 100, 7, "spam").await.unwrap(), 1);
        // Same user, different server
        assert_eq!(store.add_warn(42, 200, 7, "spam").await.unwrap(), 1);

        assert_eq!(store.remove_warn(1, 42, 100).await.unwrap(), 1);
        let remaining = store.get_warnings(42, 100).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
        assert_eq!(remaining[0].reason, "spam again");

        // Ids are never compacted, the next one continues from the max
        assert_eq!(store.add_warn(42, 100, 7, "third").await.unwrap(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_warns_get_distinct_ids() {
        let store = Arc::new(InMemoryRecordStore::new());

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add_warn(1, 1, 1, &format!("warn {i}")).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=64).collect::<Vec<u32>>());
        assert_eq!(store.get_warnings(1, 1).await.unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_remove_unknown_warn_is_noop() {
        let store = InMemoryRecordStore::new();
        assert_eq!(store.remove_warn(9, 1, 1).await.unwrap(), 0);

        store.add_warn(1, 1, 2, "reason").await.unwrap();
        assert_eq!(store.remove_warn(9, 1, 1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_markers_and_prefix() {
        let store = InMemoryRecordStore::new();

        store.disable_cog(1, "fun").await.unwrap();
        store.disable_cog(1, "fun").await.unwrap();
        assert_eq!(store.get_disabled_cogs(1).await.unwrap(), vec!["fun"]);
        assert!(store.is_cog_disabled(1, "fun").await.unwrap());
        // Commands and cogs don't share markers
        assert!(store.is_command_enabled(1, "fun").await.unwrap());

        store.enable_cog(1, "fun").await.unwrap();
        assert!(store.is_cog_enabled(1, "fun").await.unwrap());

        assert_eq!(store.get_prefix(1).await.unwrap(), None);
        store.set_prefix(1, "!!").await.unwrap();
        store.set_prefix(1, "?").await.unwrap();
        assert_eq!(store.get_prefix(1).await.unwrap().as_deref(), Some("?"));
    }
}
