// Record domain models - warnings and per-server configuration.
//
// These are pure domain types with no database dependencies.
// The infra layer maps rows onto them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A moderation warning issued to a user in a server.
///
/// `id` is only unique within the warn scope `(user_id, server_id)`: two users
/// (or one user in two servers) can both hold warning #1. Callers show and
/// reference warnings by this per-scope number.
///
/// Rows with NULL columns (the `warns` table declares none NOT NULL) read
/// back as `0` for numbers and `""` for the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub id: u32,
    pub user_id: u64,
    pub server_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    /// Unix epoch seconds, assigned by the store at insertion time.
    pub created_at: i64,
}

impl Warning {
    /// The insertion time as a UTC timestamp, `None` if out of chrono's range.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

/// The two marker-row families that switch bot features off per server.
///
/// Presence of a marker means disabled, absence means enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Toggle {
    /// A single command, e.g. `ban`.
    Command,
    /// A cog: a named group of related commands.
    Cog,
}

impl std::fmt::Display for Toggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Toggle::Command => write!(f, "command"),
            Toggle::Cog => write!(f, "cog"),
        }
    }
}

/// Snapshot of everything configured for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub server_id: u64,
    /// Effective prefix, falling back to the application default.
    pub prefix: String,
    /// True when no prefix row exists and `prefix` is the default.
    pub prefix_is_default: bool,
    pub disabled_commands: Vec<String>,
    pub disabled_cogs: Vec<String>,
}
