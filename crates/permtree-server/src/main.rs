//! permtree CLI
//!
//! Answers permission queries against an inventory snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Visible roots for a user
//! permtree --snapshot inventory.json children user:alice
//!
//! # Expand a tree position
//! permtree --snapshot inventory.json children user:alice --key 1:2
//!
//! # With config file and env overrides
//! PERMTREE_CACHE__ENABLED=true permtree --config permtree.yaml assets group:ops
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use permtree_server::observability::{init_logging, LoggingConfig};
use permtree_server::{build_handler, AppConfig, StoreHandler};

/// permtree - hierarchical grant resolution
#[derive(Parser, Debug)]
#[command(name = "permtree")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// Inventory snapshot (JSON); overrides storage.snapshot_path
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assets the principal can reach
    Assets { principal: String },
    /// Granted nodes and touch points
    Nodes { principal: String },
    /// Granted assets under a node
    NodeAssets {
        principal: String,
        /// Node id
        #[arg(long)]
        node: String,
    },
    /// Visible children of a tree position (roots when --key is omitted)
    Children {
        principal: String,
        #[arg(long)]
        key: Option<String>,
    },
    /// System users and actions on an asset
    Actions {
        principal: String,
        #[arg(long)]
        asset: String,
    },
    /// Granted applications
    Applications { principal: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if let Some(config_path) = &args.config {
        AppConfig::load(config_path)?
    } else {
        AppConfig::from_env()?
    };

    init_logging(LoggingConfig::from(&config.logging));

    let handler = build_handler(&config, args.snapshot.as_deref())?;
    run(&handler, args.command, args.pretty).await
}

async fn run(handler: &StoreHandler, command: Command, pretty: bool) -> anyhow::Result<()> {
    match command {
        Command::Assets { principal } => print(&handler.granted_assets(&principal).await?, pretty),
        Command::Nodes { principal } => print(&handler.granted_nodes(&principal).await?, pretty),
        Command::NodeAssets { principal, node } => {
            print(&handler.node_assets(&principal, &node).await?, pretty)
        }
        Command::Children { principal, key } => print(
            &handler.node_children(&principal, key.as_deref()).await?,
            pretty,
        ),
        Command::Actions { principal, asset } => print(
            &handler.asset_system_users(&principal, &asset).await?,
            pretty,
        ),
        Command::Applications { principal } => {
            print(&handler.granted_applications(&principal).await?, pretty)
        }
    }
}

fn print<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
