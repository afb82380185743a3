//! # Maturity - Gap-Analysis Server
//!
//! The main binary for the maturity gap-analysis engine.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based)
//! - CLI interface over JSON request files
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/maturity (THE BINARY)             │
//! │                                                      │
//! │   ┌─────────────┐            ┌─────────────┐         │
//! │   │    CLI      │            │  HTTP API   │         │
//! │   │   (clap)    │            │   (axum)    │         │
//! │   └──────┬──────┘            └──────┬──────┘         │
//! │          └─────────────┬────────────┘                │
//! │                        ▼                             │
//! │                ┌───────────────┐                     │
//! │                │ maturity-core │                     │
//! │                │  (THE LOGIC)  │                     │
//! │                └───────────────┘                     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! maturity server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! maturity level -s 62.5 -t profundidad
//! maturity assess -f assessment.json
//! maturity aggregate -f a1.json -f a2.json --json-mode
//! ```

use clap::Parser;
use maturity::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // MATURITY_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MATURITY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "maturity=info,tower_http=debug".into());

    // Logs go to stderr so --json-mode output stays parseable.
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

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  ┌┬┐┌─┐┌┬┐┬ ┬┬─┐┬┌┬┐┬ ┬
  │││├─┤ │ │ │├┬┘│ │ └┬┘
  ┴ ┴┴ ┴ ┴ └─┘┴└─┴ ┴  ┴

  Gap-Analysis Engine v{}

  Score • Expect • Classify
"#,
        env!("CARGO_PKG_VERSION")
    );
}
