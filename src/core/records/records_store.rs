// Storage ports for the record families.
//
// Warnings, disabled commands, disabled cogs and prefixes are independent
// families with no invariants across them, so each gets its own trait.
// Implementations live in `infra::records`.

use super::records_models::{Toggle, Warning};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Failures surfaced by record stores.
///
/// "Not found" is never an error here: missing rows come back as empty
/// lists, `None`, or a no-op.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The backend rejected a statement or the connection failed.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A stored integer does not fit the domain type.
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ============================================================================
// STORAGE TRAITS (PORTS)
// ============================================================================

/// Per-(user, server) moderation warnings.
#[async_trait]
pub trait WarnStore: Send + Sync {
    /// Record a warning and return its id: one more than the highest id in
    /// the warn scope, or 1 for the first warning.
    async fn add_warn(
        &self,
        user_id: u64,
        server_id: u64,
        moderator_id: u64,
        reason: &str,
    ) -> Result<u32, RecordError>;

    /// Delete the warning matching all three keys, then return how many
    /// warnings remain in the scope. Unknown ids are a no-op. Remaining ids
    /// are never renumbered.
    async fn remove_warn(&self, warn_id: u32, user_id: u64, server_id: u64)
        -> Result<u32, RecordError>;

    /// All warnings for the scope in insertion order.
    async fn get_warnings(&self, user_id: u64, server_id: u64)
        -> Result<Vec<Warning>, RecordError>;
}

/// Disabled-marker rows for commands and cogs.
///
/// Implementors provide the four primitives keyed by [`Toggle`]; the named
/// per-family operations are built on top of them.
#[async_trait]
pub trait ToggleStore: Send + Sync {
    /// Whether a marker row exists for `name` in the server.
    async fn is_disabled(&self, kind: Toggle, server_id: u64, name: &str)
        -> Result<bool, RecordError>;

    /// Insert the marker if absent. Never duplicates a marker.
    async fn disable(&self, kind: Toggle, server_id: u64, name: &str) -> Result<(), RecordError>;

    /// Delete the marker if present.
    async fn enable(&self, kind: Toggle, server_id: u64, name: &str) -> Result<(), RecordError>;

    /// Every disabled name of this kind for the server.
    async fn list_disabled(&self, kind: Toggle, server_id: u64)
        -> Result<Vec<String>, RecordError>;

    async fn is_command_enabled(&self, server_id: u64, command: &str) -> Result<bool, RecordError> {
        Ok(!self.is_disabled(Toggle::Command, server_id, command).await?)
    }

    async fn is_command_disabled(&self, server_id: u64, command: &str) -> Result<bool, RecordError> {
        self.is_disabled(Toggle::Command, server_id, command).await
    }

    async fn disable_command(&self, server_id: u64, command: &str) -> Result<(), RecordError> {
        self.disable(Toggle::Command, server_id, command).await
    }

    async fn enable_command(&self, server_id: u64, command: &str) -> Result<(), RecordError> {
        self.enable(Toggle::Command, server_id, command).await
    }

    async fn get_disabled_commands(&self, server_id: u64) -> Result<Vec<String>, RecordError> {
        self.list_disabled(Toggle::Command, server_id).await
    }

    async fn is_cog_enabled(&self, server_id: u64, cog: &str) -> Result<bool, RecordError> {
        Ok(!self.is_disabled(Toggle::Cog, server_id, cog).await?)
    }

    async fn is_cog_disabled(&self, server_id: u64, cog: &str) -> Result<bool, RecordError> {
        self.is_disabled(Toggle::Cog, server_id, cog).await
    }

    async fn disable_cog(&self, server_id: u64, cog: &str) -> Result<(), RecordError> {
        self.disable(Toggle::Cog, server_id, cog).await
    }

    async fn enable_cog(&self, server_id: u64, cog: &str) -> Result<(), RecordError> {
        self.enable(Toggle::Cog, server_id, cog).await
    }

    async fn get_disabled_cogs(&self, server_id: u64) -> Result<Vec<String>, RecordError> {
        self.list_disabled(Toggle::Cog, server_id).await
    }
}

/// One command prefix per server.
#[async_trait]
pub trait PrefixStore: Send + Sync {
    /// Store the prefix, replacing any previous one.
    async fn set_prefix(&self, server_id: u64, prefix: &str) -> Result<(), RecordError>;

    /// The stored prefix, or `None` when the server never set one.
    /// Callers substitute their default prefix for `None`.
    async fn get_prefix(&self, server_id: u64) -> Result<Option<String>, RecordError>;
}

/// The full record store façade: every family behind one handle.
pub trait RecordStore: WarnStore + ToggleStore + PrefixStore {}

impl<T: WarnStore + ToggleStore + PrefixStore> RecordStore for T {}
