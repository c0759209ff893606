//! # Marquee - Movie Catalog Viewer
//!
//! The main binary for Marquee.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based) for a presentation layer
//! - CLI interface for browsing, searching, and favorites
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     apps/marquee (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐    │
//! │  │   CLI       │    │   HTTP API  │    │  Movie source    │    │
//! │  │  (clap)     │    │   (axum)    │    │  (reqwest/seed)  │    │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘    │
//! │         │                  │                    │              │
//! │         └─────────► Runtime (tokio task) ◄──────┘              │
//! │                            │                                   │
//! │                            ▼                                   │
//! │                    ┌───────────────┐                           │
//! │                    │ marquee-core  │                           │
//! │                    │ (THE LOGIC)   │                           │
//! │                    └───────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! marquee serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! marquee list --query the
//! marquee search batman
//! marquee toggle 155
//! marquee favorites
//! ```

use clap::Parser;
use marquee::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing - MARQUEE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MARQUEE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "marquee=info,marquee_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Marquee startup banner.
fn print_banner() {
    println!(
        r#"
  ╔╦╗╔═╗╦═╗╔═╗ ╦ ╦╔═╗╔═╗
  ║║║╠═╣╠╦╝║═╬╗║ ║║╣ ║╣
  ╩ ╩╩ ╩╩╚═╚═╝╚╚═╝╚═╝╚═╝

  Movie Catalog Viewer v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
