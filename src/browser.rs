//! Headless Chromium lifecycle via chromiumoxide.

use crate::error::{Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::info;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. VANTAGE_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("VANTAGE_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.vantage/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".vantage/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".vantage/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".vantage/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".vantage/chromium/chrome-linux64/chrome"),
                home.join(".vantage/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A headless Chromium instance owned for the duration of one verification run.
pub struct HeadlessBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl HeadlessBrowser {
    /// Launch headless Chromium, preferring an explicit binary path over
    /// discovery via [`find_chromium`].
    pub async fn launch(chrome_path: Option<PathBuf>) -> Result<Self> {
        let chrome_path = chrome_path.or_else(find_chromium).ok_or_else(|| {
            Error::Config(
                "Chromium not found. Set VANTAGE_CHROMIUM_PATH or install google-chrome."
                    .to_string(),
            )
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(Error::Config)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // Drive the CDP message loop for the life of the browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        info!("Chromium launched");
        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open a fresh page.
    pub async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(Into::into)
    }

    /// Close the browser and stop the message loop. Errors during shutdown are
    /// swallowed; cleanup must not mask the run's real outcome.
    pub async fn close(mut self) -> Result<()> {
        let _ = self.browser.close().await;
        self.handler_task.abort();
        Ok(())
    }
}

/// Subscribe to the page's console and echo each message to stdout.
pub async fn echo_console(page: &Page) -> Result<()> {
    let mut messages = page.event_listener::<EventConsoleApiCalled>().await?;
    tokio::spawn(async move {
        while let Some(event) = messages.next().await {
            println!("CONSOLE: {}", console_text(&event));
        }
    });
    Ok(())
}

fn console_text(event: &EventConsoleApiCalled) -> String {
    event
        .args
        .iter()
        .map(|arg| match (&arg.value, &arg.description) {
            (Some(serde_json::Value::String(s)), _) => s.clone(),
            (Some(v), _) => v.to_string(),
            (None, Some(d)) => d.clone(),
            (None, None) => "<object>".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Navigate the page to a URL, bounded by a timeout, then wait for the load
/// to settle.
pub async fn navigate(page: &Page, url: &str, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    let result = tokio::time::timeout(timeout, page.goto(url)).await;

    match result {
        Ok(Ok(_)) => {
            let _ = page.wait_for_navigation().await;
            tracing::debug!("navigated to {url} in {}ms", start.elapsed().as_millis());
            Ok(())
        }
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(Error::timeout(
            format!("navigation to {url}"),
            timeout.as_millis() as u64,
        )),
    }
}
