// Copyright 2026 Vantage Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use vantage::cli::{self, verify_cmd::RunArgs};

#[derive(Parser)]
#[command(
    name = "vantage",
    about = "Vantage — headless verification harness for the IAM admin console",
    version,
    after_help = "Run 'vantage' with no command to execute the default verification scenario."
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the admin-panel verification scenario
    Run(RunArgs),
    /// Check environment and diagnose issues
    Doctor {
        /// Output directory to probe for writability
        #[arg(long, default_value = "verification")]
        out_dir: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "vantage=debug" } else { "vantage=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        // No subcommand → run the default scenario
        None => cli::verify_cmd::run(RunArgs::default(), cli.quiet).await,

        Some(Commands::Run(args)) => cli::verify_cmd::run(args, cli.quiet).await,
        Some(Commands::Doctor { out_dir }) => cli::doctor::run(&out_dir).await,
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vantage", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success (including evidenced verification
    // failures), 1=harness error
    if let Err(e) = &result {
        if !cli.quiet {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
