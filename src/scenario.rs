//! The admin-panel verification scenario.
//!
//! Sequence: launch headless Chromium, install route mocks, open the login
//! page, install the fixture token via the app's dev hook, wait for the auth
//! flag, open the admin permissions page, wait for its heading, screenshot.
//! A timeout or error inside that sequence is caught, logged, and evidenced
//! with a diagnostic screenshot; the browser is always closed.

use crate::browser::{self, HeadlessBrowser};
use crate::error::Result;
use crate::mock::MockRouter;
use crate::token::FixtureToken;
use crate::wait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default target under test.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5176";

/// Expression the app sets once its auth context has picked up the token.
const AUTH_FLAG_EXPR: &str = "window.__hasToken === true";

/// Heading the admin permissions page renders.
pub const ADMIN_HEADING: &str = "Manage Permissions";

/// Configuration for one verification run.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub base_url: Url,
    pub login_path: String,
    pub admin_path: String,
    pub heading: String,
    /// Bound on each navigation.
    pub nav_timeout: Duration,
    /// Bound on the auth-flag and heading waits.
    pub wait_timeout: Duration,
    /// Directory receiving all screenshots.
    pub out_dir: PathBuf,
    /// Explicit Chromium binary, overriding discovery.
    pub chromium: Option<PathBuf>,
    /// Suppress progress narration on stdout.
    pub quiet: bool,
}

impl VerifyConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            login_path: "/login".to_string(),
            admin_path: "/admin/permissions".to_string(),
            heading: ADMIN_HEADING.to_string(),
            nav_timeout: Duration::from_secs(60),
            wait_timeout: Duration::from_secs(60),
            out_dir: PathBuf::from("verification"),
            chromium: None,
            quiet: false,
        }
    }

    pub fn login_url(&self) -> Result<Url> {
        self.base_url.join(&self.login_path).map_err(Into::into)
    }

    pub fn admin_url(&self) -> Result<Url> {
        self.base_url.join(&self.admin_path).map_err(Into::into)
    }

    /// Screenshot written when the whole flow succeeds.
    pub fn success_path(&self) -> PathBuf {
        self.out_dir.join("verification.png")
    }

    /// Screenshot written when a bounded wait expires.
    pub fn timeout_path(&self) -> PathBuf {
        self.out_dir.join("timeout_error.png")
    }

    /// Screenshot written on any other failure.
    pub fn error_path(&self) -> PathBuf {
        self.out_dir.join("error.png")
    }
}

/// How a verification run ended. Only `Passed` means the flow was verified;
/// the other two still produced diagnostic screenshots and a clean shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    TimedOut,
    Failed,
}

/// Execute the verification scenario.
///
/// Launch failures propagate; once a page exists, timeouts and errors are
/// caught, evidenced, and folded into the returned [`Outcome`].
pub async fn run(config: &VerifyConfig) -> Result<Outcome> {
    std::fs::create_dir_all(&config.out_dir)?;

    let token = FixtureToken::admin().encode()?;
    let router = MockRouter::admin_flow(&token);

    let browser = HeadlessBrowser::launch(config.chromium.clone()).await?;
    let page = match browser.new_page().await {
        Ok(page) => page,
        Err(e) => {
            browser.close().await.ok();
            return Err(e);
        }
    };

    let outcome = match drive(&page, config, &token, &router).await {
        Ok(()) => Outcome::Passed,
        Err(e) if e.is_timeout() => {
            println!("Script timed out: {e}");
            save_screenshot_best_effort(&page, &config.timeout_path()).await;
            Outcome::TimedOut
        }
        Err(e) => {
            println!("An error occurred: {e}");
            save_screenshot_best_effort(&page, &config.error_path()).await;
            Outcome::Failed
        }
    };

    browser.close().await.ok();
    Ok(outcome)
}

async fn drive(page: &Page, config: &VerifyConfig, token: &str, router: &MockRouter) -> Result<()> {
    browser::echo_console(page).await?;
    router.install(page).await?;

    let say = |msg: &str| {
        if !config.quiet {
            println!("{msg}");
        }
    };

    say("Navigating to login page...");
    browser::navigate(page, config.login_url()?.as_str(), config.nav_timeout).await?;
    say("Login page loaded.");

    say("Setting access token...");
    page.evaluate(set_token_expr(token)).await?;
    say("Access token set.");

    say("Waiting for auth state to be updated...");
    wait::wait_for_function(page, AUTH_FLAG_EXPR, config.wait_timeout, "auth flag").await?;
    say("Auth state updated.");

    say("Navigating to admin permissions page...");
    browser::navigate(page, config.admin_url()?.as_str(), config.nav_timeout).await?;
    say("Admin permissions page loaded.");

    say("Waiting for heading to be visible...");
    wait::wait_for_visible_heading(page, &config.heading, config.wait_timeout).await?;
    say("Heading is visible.");

    say("Taking screenshot...");
    save_screenshot(page, &config.success_path()).await?;
    say("Screenshot taken.");

    Ok(())
}

/// Invoke the app's dev hook. Optional-call syntax so a build without the
/// hook degrades to a wait timeout instead of a JS error.
fn set_token_expr(token: &str) -> String {
    let literal = Value::String(token.to_string()).to_string();
    format!("window.__setAccessToken?.({literal})")
}

async fn save_screenshot(page: &Page, path: &Path) -> Result<()> {
    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build();
    page.save_screenshot(params, path).await?;
    Ok(())
}

async fn save_screenshot_best_effort(page: &Page, path: &Path) {
    if let Err(e) = save_screenshot(page, path).await {
        tracing::warn!("could not capture diagnostic screenshot at {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> VerifyConfig {
        VerifyConfig::new(Url::parse(DEFAULT_BASE_URL).expect("default URL"))
    }

    #[test]
    fn urls_join_base_and_route() {
        let config = config();
        assert_eq!(
            config.login_url().expect("login url").as_str(),
            "http://localhost:5176/login"
        );
        assert_eq!(
            config.admin_url().expect("admin url").as_str(),
            "http://localhost:5176/admin/permissions"
        );
    }

    #[test]
    fn screenshot_paths_live_under_out_dir() {
        let mut config = config();
        config.out_dir = PathBuf::from("evidence");
        assert_eq!(config.success_path(), PathBuf::from("evidence/verification.png"));
        assert_eq!(config.timeout_path(), PathBuf::from("evidence/timeout_error.png"));
        assert_eq!(config.error_path(), PathBuf::from("evidence/error.png"));
    }

    #[test]
    fn token_hook_call_embeds_the_token_as_a_string_literal() {
        let expr = set_token_expr("a.b.");
        assert_eq!(expr, r#"window.__setAccessToken?.("a.b.")"#);
    }
}
