//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `replay <events.jsonl>` -- drive the poll engine from recorded gateway events
//! - `config show|get|path` -- inspect configuration
//! - `version` -- print build/version info

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Poll engine for chat-bot vote commands.
#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = env!("CARGO_PKG_VERSION"),
    about = "Tally, a concurrent poll engine for chat-bot vote commands"
)]
pub struct Cli {
    /// Path to the JSON5 config file (default: $TALLY_CONFIG or ./tally.json5).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay JSON-lines gateway events, one task per event, printing each reply.
    Replay {
        /// File with one gateway event per line.
        events: PathBuf,
    },

    /// Inspect configuration values.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print version, build date, and git commit information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the fully loaded configuration as JSON.
    Show,

    /// Print a specific configuration value by dot-notation path.
    Get {
        /// Dot-notation key (e.g. "polls.defaultDueDays").
        key: String,
    },

    /// Print the resolved configuration file path.
    Path,
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

use crate::config::{self, Config};
use crate::gateway::{Dispatcher, GatewayEvent, GatewayReply};
use crate::polls::create_engine;
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::info;

/// Run the `replay` subcommand.
///
/// Button presses run concurrently on the blocking pool. A poll-creating
/// command waits for every earlier event to finish first, so later presses
/// always find their poll.
pub async fn handle_replay(
    events: &Path,
    cfg: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(events).await?;
    let dispatcher = Dispatcher::new(create_engine(), cfg.polls.clone());
    let mut pending: JoinSet<GatewayReply> = JoinSet::new();

    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: GatewayEvent = serde_json::from_str(line)
            .map_err(|e| format!("{}:{}: {}", events.display(), line_no + 1, e))?;

        match event {
            GatewayEvent::Command { .. } => {
                drain(&mut pending).await?;
                print_reply(&dispatcher.handle(event))?;
            }
            GatewayEvent::Component { .. } => {
                let dispatcher = dispatcher.clone();
                pending.spawn_blocking(move || dispatcher.handle(event));
            }
        }
    }
    drain(&mut pending).await?;

    let stats = dispatcher.engine().stats();
    info!(
        polls = stats.total_polls,
        open = stats.open_polls,
        closed = stats.closed_polls,
        ballots = stats.total_ballots,
        "Replay finished"
    );
    Ok(())
}

async fn drain(pending: &mut JoinSet<GatewayReply>) -> Result<(), Box<dyn std::error::Error>> {
    while let Some(reply) = pending.join_next().await {
        print_reply(&reply?)?;
    }
    Ok(())
}

fn print_reply(reply: &GatewayReply) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(reply)?);
    Ok(())
}

/// Run the `config show` subcommand.
pub fn handle_config_show(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(cfg)?);
    Ok(())
}

/// Run the `config get <key>` subcommand.
pub fn handle_config_get(cfg: &Config, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let value = serde_json::to_value(cfg)?;
    match get_value_at_path(&value, key) {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => return Err(format!("Key not found: {}", key).into()),
    }
    Ok(())
}

/// Run the `config path` subcommand.
pub fn handle_config_path(explicit: Option<&Path>) {
    println!("{}", config::get_config_path(explicit).display());
}

/// Run the `version` subcommand.
pub fn handle_version() {
    println!("tally {}", env!("CARGO_PKG_VERSION"));
    println!("  Build date: {}", env!("TALLY_BUILD_DATE"));
    println!("  Git commit: {}", env!("TALLY_GIT_HASH"));
    println!(
        "  Platform:   {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Navigate a JSON value by dot-notation path and return the leaf value.
fn get_value_at_path(root: &Value, path: &str) -> Option<Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["tally"]).is_err());
    }

    #[test]
    fn test_cli_replay_subcommand() {
        let cli = Cli::try_parse_from(["tally", "replay", "events.jsonl"]).unwrap();
        match cli.command {
            Command::Replay { events } => assert_eq!(events, PathBuf::from("events.jsonl")),
            other => panic!("Expected Replay, got {:?}", other),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_global_config_flag() {
        let cli =
            Cli::try_parse_from(["tally", "config", "show", "--config", "my.json5"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("my.json5")));
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Show)));
    }

    #[test]
    fn test_cli_config_get() {
        let cli = Cli::try_parse_from(["tally", "config", "get", "polls.defaultDueDays"]).unwrap();
        match cli.command {
            Command::Config(ConfigCommand::Get { ref key }) => {
                assert_eq!(key, "polls.defaultDueDays");
            }
            other => panic!("Expected Config(Get), got {:?}", other),
        }
    }

    #[test]
    fn test_cli_version_subcommand() {
        let cli = Cli::try_parse_from(["tally", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn test_get_value_at_path() {
        let root = json!({"polls": {"defaultDueDays": 30}});
        assert_eq!(get_value_at_path(&root, "polls.defaultDueDays"), Some(json!(30)));
        assert_eq!(get_value_at_path(&root, "polls"), Some(json!({"defaultDueDays": 30})));
        assert_eq!(get_value_at_path(&root, "polls.missing"), None);
    }

    #[test]
    fn test_config_get_reads_serialized_config() {
        let cfg = Config::default();
        assert!(handle_config_get(&cfg, "polls.defaultMaxVotes").is_ok());
        assert!(handle_config_get(&cfg, "nope.nothing").is_err());
    }

    #[tokio::test]
    async fn test_replay_runs_events_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let events = [
            r#"{"type":"command","message_id":"m1","user_id":"owner","options":[{"name":"title","value":"Lunch"},{"name":"choices","value":"A,B"}]}"#,
            r#"# presses"#,
            r#"{"type":"component","message_id":"m1","user_id":"u1","custom_id":"choice_0"}"#,
            r#"{"type":"component","message_id":"m1","user_id":"u2","custom_id":"choice_1"}"#,
            "",
        ];
        std::fs::write(&path, events.join("\n")).unwrap();
        assert!(handle_replay(&path, &Config::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_replay_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, "{not json}\n").unwrap();
        let err = handle_replay(&path, &Config::default()).await.unwrap_err();
        assert!(err.to_string().contains(":1:"));
    }
}
