//! `vantage run` — execute the admin-panel verification scenario.

use crate::scenario::{self, Outcome, VerifyConfig, DEFAULT_BASE_URL};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Arguments for the run command; defaults reproduce the original scenario
/// against a local dev server.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Base URL of the application under test
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory for screenshot evidence
    #[arg(long, default_value = "verification")]
    pub out_dir: PathBuf,

    /// Timeout in seconds for each navigation and wait
    #[arg(long, default_value = "60")]
    pub timeout: u64,

    /// Explicit Chromium binary path (overrides discovery)
    #[arg(long)]
    pub chromium: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            out_dir: PathBuf::from("verification"),
            timeout: 60,
            chromium: None,
        }
    }
}

/// Run the verification scenario. A timeout or in-flow error is reported and
/// evidenced but does not become a process-level failure.
pub async fn run(args: RunArgs, quiet: bool) -> Result<()> {
    let base_url = Url::parse(&args.base_url)
        .with_context(|| format!("invalid base URL: {}", args.base_url))?;

    let mut config = VerifyConfig::new(base_url);
    config.nav_timeout = Duration::from_secs(args.timeout);
    config.wait_timeout = Duration::from_secs(args.timeout);
    config.out_dir = args.out_dir;
    config.chromium = args.chromium;
    config.quiet = quiet;

    let outcome = scenario::run(&config).await?;

    if !quiet {
        match outcome {
            Outcome::Passed => println!(
                "Verification passed. Screenshot: {}",
                config.success_path().display()
            ),
            Outcome::TimedOut => println!(
                "Verification timed out. Screenshot: {}",
                config.timeout_path().display()
            ),
            Outcome::Failed => println!(
                "Verification failed. Screenshot: {}",
                config.error_path().display()
            ),
        }
    }

    Ok(())
}
