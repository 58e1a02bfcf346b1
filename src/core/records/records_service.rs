// Server settings service - what the command dispatcher asks before running
// anything: which prefix applies, and whether a command may run at all.
//
// NO database dependencies here, only the storage ports.

use super::records_models::{ServerSettings, Toggle};
use super::records_store::{PrefixStore, RecordError, ToggleStore};

pub struct SettingsService<S: ToggleStore + PrefixStore> {
    store: S,
    default_prefix: String,
}

impl<S: ToggleStore + PrefixStore> SettingsService<S> {
    pub fn new(store: S, default_prefix: impl Into<String>) -> Self {
        Self {
            store,
            default_prefix: default_prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    /// The prefix in effect for a server.
    pub async fn prefix_for(&self, server_id: u64) -> Result<String, RecordError> {
        Ok(self
            .store
            .get_prefix(server_id)
            .await?
            .unwrap_or_else(|| self.default_prefix.clone()))
    }

    /// A command runs only if neither it nor its cog is disabled.
    pub async fn can_run(&self, server_id: u64, cog: &str, command: &str) -> Result<bool, RecordError> {
        if self.store.is_cog_disabled(server_id, cog).await? {
            return Ok(false);
        }
        self.store.is_command_enabled(server_id, command).await
    }

    pub async fn set_command_enabled(
        &self,
        server_id: u64,
        command: &str,
        enabled: bool,
    ) -> Result<(), RecordError> {
        self.set_enabled(Toggle::Command, server_id, command, enabled)
            .await
    }

    pub async fn set_cog_enabled(
        &self,
        server_id: u64,
        cog: &str,
        enabled: bool,
    ) -> Result<(), RecordError> {
        self.set_enabled(Toggle::Cog, server_id, cog, enabled).await
    }

    async fn set_enabled(
        &self,
        kind: Toggle,
        server_id: u64,
        name: &str,
        enabled: bool,
    ) -> Result<(), RecordError> {
        if enabled {
            self.store.enable(kind, server_id, name).await?;
        } else {
            self.store.disable(kind, server_id, name).await?;
        }
        tracing::info!(%kind, server_id, name, enabled, "Updated toggle");
        Ok(())
    }

    pub async fn snapshot(&self, server_id: u64) -> Result<ServerSettings, RecordError> {
        let stored = self.store.get_prefix(server_id).await?;
        let prefix_is_default = stored.is_none();
        let prefix = stored.unwrap_or_else(|| self.default_prefix.clone());

        Ok(ServerSettings {
            server_id,
            prefix,
            prefix_is_default,
            disabled_commands: self.store.get_disabled_commands(server_id).await?,
            disabled_cogs: self.store.get_disabled_cogs(server_id).await?,
        })
    }
}
