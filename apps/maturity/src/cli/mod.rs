//! # Maturity CLI Module
//!
//! Command-line interface over the gap-analysis engine.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `level` - Map a score to its ordinal level
//! - `classify` - Classify an actual level against an expectation
//! - `indicator` - Analyse one indicator from a JSON request file
//! - `assess` - Analyse an assessment from a JSON request file
//! - `aggregate` - Aggregate assessment analyses into a school report
//! - `score` - Score raw questionnaire responses

mod commands;

use crate::config::AppConfig;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Maturity - gap analysis for school self-assessments
///
/// Compares indicator scores with the trajectory expected for a school's
/// transformation year and summarizes the gaps.
#[derive(Parser, Debug)]
#[command(name = "maturity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file (falls back to MATURITY_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the configuration file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the configuration file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Map a 0-100 score to its ordinal level
    Level {
        /// Normalized score
        #[arg(short, long)]
        score: f64,

        /// Indicator category (profundidad, cobertura, frecuencia)
        #[arg(short = 't', long, default_value = "profundidad")]
        category: String,
    },

    /// Classify an actual level against an expected level
    Classify {
        /// Actual level reached
        #[arg(short, long)]
        actual: u8,

        /// Expected level; omit for an unconfigured indicator
        #[arg(short, long)]
        expected: Option<u8>,

        /// Allowed shortfall in levels
        #[arg(short = 'T', long, default_value = "0")]
        tolerance: u32,

        /// Indicator category (profundidad, cobertura, frecuencia)
        #[arg(short = 't', long, default_value = "profundidad")]
        category: String,
    },

    /// Analyse one indicator from a JSON request file
    Indicator {
        /// Path to the request file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Analyse an assessment instance from a JSON request file
    Assess {
        /// Path to the request file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Aggregate assessment analyses into a school report
    Aggregate {
        /// Analysis files (one analysis or an array of analyses each)
        #[arg(short, long, required = true)]
        file: Vec<PathBuf>,

        /// Length of the critical indicator ranking (0 keeps every entry)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Score raw questionnaire responses from a JSON request file
    Score {
        /// Path to the request file
        #[arg(short, long)]
        file: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let json_mode = cli.json_mode;
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if cli.verbose {
        tracing::info!(?config, "Configuration loaded");
    }

    match cli.command {
        Commands::Server { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(config).await
        }
        Commands::Level { score, category } => cmd_level(json_mode, score, &category),
        Commands::Classify {
            actual,
            expected,
            tolerance,
            category,
        } => cmd_classify(json_mode, actual, expected, tolerance, &category),
        Commands::Indicator { file } => cmd_indicator(json_mode, &file),
        Commands::Assess { file } => cmd_assess(json_mode, &file),
        Commands::Aggregate { file, limit } => {
            if let Some(limit) = limit {
                config.report.top_critical_limit = limit;
            }
            cmd_aggregate(json_mode, &file, &config)
        }
        Commands::Score { file } => cmd_score(json_mode, &file, &config),
    }
}
