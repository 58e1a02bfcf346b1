// Maintenance CLI for the bot's record database.
//
// This file's job is to:
// 1. Load configuration
// 2. Open the connection pool (the store never does this itself)
// 3. Run one store operation and print the result
//
// The schema must already exist; see schema.sql.

use anyhow::Context;
use bot_records::{
    PrefixStore, SettingsService, SqliteRecordStore, StoreConfig, Toggle, ToggleStore, WarnStore,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;

#[derive(Parser, Debug)]
#[command(name = "bot-records")]
#[command(about = "Inspect and edit warnings and per-server bot settings")]
#[command(version)]
struct Args {
    /// Overrides DATABASE_URL from the environment
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    section: Section,
}

#[derive(Subcommand, Debug)]
enum Section {
    /// Moderation warnings
    Warn {
        #[command(subcommand)]
        action: WarnAction,
    },
    /// Disabled commands
    Command {
        #[command(subcommand)]
        action: ToggleAction,
    },
    /// Disabled cogs
    Cog {
        #[command(subcommand)]
        action: ToggleAction,
    },
    /// Command prefix
    Prefix {
        #[command(subcommand)]
        action: PrefixAction,
    },
    /// Everything configured for one server
    Settings { server_id: u64 },
}

#[derive(Subcommand, Debug)]
enum WarnAction {
    Add {
        user_id: u64,
        server_id: u64,
        moderator_id: u64,
        reason: String,
    },
    Remove {
        warn_id: u32,
        user_id: u64,
        server_id: u64,
    },
    List {
        user_id: u64,
        server_id: u64,
    },
}

#[derive(Subcommand, Debug)]
enum ToggleAction {
    Enable { server_id: u64, name: String },
    Disable { server_id: u64, name: String },
    Status { server_id: u64, name: String },
    List { server_id: u64 },
}

#[derive(Subcommand, Debug)]
enum PrefixAction {
    Get { server_id: u64 },
    Set { server_id: u64, prefix: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = StoreConfig::from_lookup(|key| match (key, &args.database_url) {
        ("DATABASE_URL", Some(url)) => Some(url.clone()),
        _ => std::env::var(key).ok(),
    })
    .context("Failed to load configuration")?;
    let conn_str = config.connection_string();
    tracing::debug!("Connecting to {}", conn_str);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&conn_str)
        .await
        .with_context(|| format!("Failed to connect to {}", conn_str))?;

    let store = SqliteRecordStore::new(pool.clone());
    let result = run(args.section, args.json, store, &config.default_prefix).await;

    pool.close().await;
    result
}

async fn run(
    section: Section,
    as_json: bool,
    store: SqliteRecordStore,
    default_prefix: &str,
) -> anyhow::Result<()> {
    match section {
        Section::Warn { action } => run_warn(action, as_json, &store).await,
        Section::Command { action } => run_toggle(Toggle::Command, action, as_json, &store).await,
        Section::Cog { action } => run_toggle(Toggle::Cog, action, as_json, &store).await,
        Section::Prefix { action } => run_prefix(action, as_json, &store, default_prefix).await,
        Section::Settings { server_id } => {
            let service = SettingsService::new(store, default_prefix);
            let settings = service.snapshot(server_id).await?;
            if as_json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                let origin = if settings.prefix_is_default {
                    " (default)"
                } else {
                    ""
                };
                println!("Server {}", settings.server_id);
                println!("  prefix: {}{}", settings.prefix, origin);
                println!("  disabled commands: {}", join_or_none(&settings.disabled_commands));
                println!("  disabled cogs: {}", join_or_none(&settings.disabled_cogs));
            }
            Ok(())
        }
    }
}

async fn run_warn(action: WarnAction, as_json: bool, store: &SqliteRecordStore) -> anyhow::Result<()> {
    match action {
        WarnAction::Add {
            user_id,
            server_id,
            moderator_id,
            reason,
        } => {
            let warn_id = store
                .add_warn(user_id, server_id, moderator_id, &reason)
                .await?;
            tracing::info!(user_id, server_id, warn_id, "Warning recorded");
            if as_json {
                println!("{}", json!({ "warn_id": warn_id }));
            } else {
                println!("Added warning #{warn_id} for user {user_id} in server {server_id}");
            }
        }
        WarnAction::Remove {
            warn_id,
            user_id,
            server_id,
        } => {
            let remaining = store.remove_warn(warn_id, user_id, server_id).await?;
            if as_json {
                println!("{}", json!({ "remaining": remaining }));
            } else {
                println!("User {user_id} has {remaining} warning(s) left in server {server_id}");
            }
        }
        WarnAction::List { user_id, server_id } => {
            let warnings = store.get_warnings(user_id, server_id).await?;
            if as_json {
                println!("{}", serde_json::to_string_pretty(&warnings)?);
            } else if warnings.is_empty() {
                println!("User {user_id} has no warnings in server {server_id}");
            } else {
                for warning in &warnings {
                    let when = warning
                        .created_at_utc()
                        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                        .unwrap_or_else(|| warning.created_at.to_string());
                    println!(
                        "#{} by {} at {}: {}",
                        warning.id, warning.moderator_id, when, warning.reason
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_toggle(
    kind: Toggle,
    action: ToggleAction,
    as_json: bool,
    store: &SqliteRecordStore,
) -> anyhow::Result<()> {
    match action {
        ToggleAction::Enable { server_id, name } => {
            store.enable(kind, server_id, &name).await?;
            print_status(kind, &name, true, as_json);
        }
        ToggleAction::Disable { server_id, name } => {
            store.disable(kind, server_id, &name).await?;
            print_status(kind, &name, false, as_json);
        }
        ToggleAction::Status { server_id, name } => {
            let disabled = store.is_disabled(kind, server_id, &name).await?;
            print_status(kind, &name, !disabled, as_json);
        }
        ToggleAction::List { server_id } => {
            let names = store.list_disabled(kind, server_id).await?;
            if as_json {
                println!("{}", json!({ "disabled": names }));
            } else {
                println!("Disabled {kind}s: {}", join_or_none(&names));
            }
        }
    }
    Ok(())
}

async fn run_prefix(
    action: PrefixAction,
    as_json: bool,
    store: &SqliteRecordStore,
    default_prefix: &str,
) -> anyhow::Result<()> {
    match action {
        PrefixAction::Get { server_id } => {
            let prefix = store.get_prefix(server_id).await?;
            if as_json {
                println!("{}", json!({ "prefix": prefix }));
            } else {
                match prefix {
                    Some(prefix) => println!("{prefix}"),
                    None => println!("not set (default {default_prefix})"),
                }
            }
        }
        PrefixAction::Set { server_id, prefix } => {
            store.set_prefix(server_id, &prefix).await?;
            if as_json {
                println!("{}", json!({ "prefix": prefix }));
            } else {
                println!("Prefix for server {server_id} is now {prefix}");
            }
        }
    }
    Ok(())
}

fn print_status(kind: Toggle, name: &str, enabled: bool, as_json: bool) {
    if as_json {
        println!("{}", json!({ "kind": kind, "name": name, "enabled": enabled }));
    } else {
        let state = if enabled { "enabled" } else { "disabled" };
        println!("{kind} {name} is {state}");
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
