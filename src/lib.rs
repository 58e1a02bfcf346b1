// Persistence for a chat bot's moderation records and per-server settings.
//
// **Architecture Overview:**
// - `core/` = Domain models, storage traits and services (database-agnostic)
// - `infra/` = Implementations of core traits (SQLite, in-memory)
// - `config` = Environment-driven settings for the binary
//
// The store never opens, migrates or closes the database: callers build the
// pool and hand it to `SqliteRecordStore::new`.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;

pub mod config;

pub use crate::config::StoreConfig;
pub use crate::core::records::{
    PrefixStore, RecordError, RecordStore, ServerSettings, SettingsService, Toggle, ToggleStore,
    WarnStore, Warning,
};
pub use crate::infra::records::{InMemoryRecordStore, SqliteRecordStore};
