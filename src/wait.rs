//! Bounded waits against page state.
//!
//! Each wait polls a JS expression until it evaluates truthy, bounded by a
//! timeout. Evaluation errors (e.g. a context torn down mid-navigation) count
//! as "not yet" rather than aborting the wait.

use crate::error::{Error, Result};
use chromiumoxide::page::Page;
use serde_json::Value;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Wait until `expr` evaluates truthy in the page, or the timeout elapses.
pub async fn wait_for_function(
    page: &Page,
    expr: &str,
    timeout: Duration,
    what: &str,
) -> Result<()> {
    let poll = async {
        loop {
            if evaluates_truthy(page, expr).await {
                return;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| Error::timeout(what, timeout.as_millis() as u64))
}

/// Wait until a heading (`h1`–`h6`) with exactly `text` is present and
/// visible, or the timeout elapses.
pub async fn wait_for_visible_heading(page: &Page, text: &str, timeout: Duration) -> Result<()> {
    let expr = heading_visible_expr(text);
    wait_for_function(
        page,
        &expr,
        timeout,
        &format!("heading \"{text}\" to be visible"),
    )
    .await
}

async fn evaluates_truthy(page: &Page, expr: &str) -> bool {
    match page.evaluate(expr).await {
        Ok(result) => is_truthy(result.value()),
        Err(e) => {
            tracing::debug!("evaluate failed while waiting: {e}");
            false
        }
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Build a JS expression that is true when a heading with the exact trimmed
/// text is rendered with a non-zero box and not hidden.
fn heading_visible_expr(text: &str) -> String {
    let literal = Value::String(text.to_string()).to_string();
    format!(
        r#"(() => {{
  const want = {literal};
  for (const h of document.querySelectorAll('h1,h2,h3,h4,h5,h6')) {{
    if (h.textContent.trim() !== want) continue;
    const box = h.getBoundingClientRect();
    const style = window.getComputedStyle(h);
    if (box.width > 0 && box.height > 0 && style.visibility !== 'hidden' && style.display !== 'none') {{
      return true;
    }}
  }}
  return false;
}})()"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_js_semantics() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("x"))));
        assert!(is_truthy(Some(&json!({}))));
    }

    #[test]
    fn heading_expr_escapes_the_text_as_a_js_literal() {
        let expr = heading_visible_expr(r#"Say "hi""#);
        assert!(expr.contains(r#"const want = "Say \"hi\"";"#));
    }
}
