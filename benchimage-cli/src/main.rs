// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! BenchImage CLI
//!
//! Command-line interface for running image filters locally or on a cloudlet
//! and for timing them across image sizes.

use clap::{Parser, Subcommand};

mod commands;

use commands::request::RequestArgs;

/// BenchImage - image filter offloading benchmark
#[derive(Parser)]
#[command(name = "benchimage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one filter pass and report its timing
    Run {
        #[command(flatten)]
        request: RequestArgs,

        /// Write the filtered image to this path as JPEG
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },

    /// Sweep a filter over image sizes and print the rows
    Bench {
        #[command(flatten)]
        request: RequestArgs,

        /// Rounds per size
        #[arg(short = 'n', long)]
        iterations: Option<u32>,

        /// Record failed rounds and keep going instead of aborting
        #[arg(long)]
        skip_failed: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = commands::bench::OutputFormat::Csv)]
        format: commands::bench::OutputFormat,
    },

    /// Validate a request file
    Validate {
        /// Path to the request YAML file
        file: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for results
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { request, output } => {
            commands::run::execute(&request, output.as_deref()).await
        }
        Commands::Bench {
            request,
            iterations,
            skip_failed,
            format,
        } => commands::bench::execute(&request, iterations, skip_failed, format).await,
        Commands::Validate { file } => commands::validate::execute(&file).await,
    }
}
