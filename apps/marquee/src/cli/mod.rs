//! # Marquee CLI Module
//!
//! This module implements the CLI interface for Marquee.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `list` - List the catalog, optionally filtered by title prefix
//! - `search` - Search the movie source
//! - `toggle` - Flip the favorite state of a movie
//! - `favorites` - List favorite movies
//! - `init` - Initialize an empty favorites store

mod commands;

use crate::config::{BackendKind, Config};
use clap::{Parser, Subcommand};
use marquee_core::MarqueeError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Marquee - movie catalog viewer
///
/// Browse a movie catalog, filter titles by prefix, search a remote movie
/// API, and keep a list of favorites.
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file (default: ./marquee.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the favorites store
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Favorites backend
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Never call the remote API, even when a key is configured
    #[arg(long, global = true)]
    pub offline: bool,

    /// Serve movies from a JSON catalog file instead of the remote API
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List movies
    List {
        /// Only titles starting with this text
        #[arg(short = 'Q', long)]
        query: Option<String>,
    },

    /// Search the movie source
    Search {
        /// Search text
        query: String,
    },

    /// Flip the favorite state of a movie
    Toggle {
        /// Movie id
        id: u64,
    },

    /// List favorite movies
    Favorites,

    /// Initialize an empty favorites store
    Init {
        /// Force initialization even if the store exists
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Load configuration and apply the global flags on top.
    pub fn config(&self) -> Result<Config, MarqueeError> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(ref path) = self.database {
            config.storage.path = path.clone();
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        Ok(config)
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MarqueeError> {
    let mut config = cli.config()?;
    let json_mode = cli.json_mode;
    let source = SourceOptions {
        offline: cli.offline,
        catalog: cli.catalog.clone(),
    };

    if cli.verbose {
        tracing::info!(storage = ?config.storage, "configuration loaded");
    }

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(&config, &source).await
        }
        Some(Commands::List { query }) => cmd_list(&config, &source, json_mode, query).await,
        Some(Commands::Search { query }) => cmd_search(&config, &source, json_mode, query).await,
        Some(Commands::Toggle { id }) => cmd_toggle(&config, &source, json_mode, id).await,
        Some(Commands::Favorites) => cmd_favorites(&config, &source, json_mode).await,
        Some(Commands::Init { force }) => cmd_init(&config, force),
        None => {
            // No subcommand - list the catalog by default
            cmd_list(&config, &source, json_mode, None).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_override_config() {
        let cli = Cli::parse_from([
            "marquee",
            "--backend",
            "file",
            "--database",
            "favs.bin",
            "--config",
            "/nonexistent/marquee.toml",
            "favorites",
        ]);
        assert_eq!(cli.backend, Some(BackendKind::File));
        assert_eq!(cli.database, Some(PathBuf::from("favs.bin")));
        assert!(matches!(cli.command, Some(Commands::Favorites)));
        assert!(cli.config().is_err());
    }

    #[test]
    fn search_takes_positional_query() {
        let cli = Cli::parse_from(["marquee", "--offline", "search", "bat"]);
        assert!(cli.offline);
        assert!(matches!(cli.command, Some(Commands::Search { ref query }) if query == "bat"));
    }
}
