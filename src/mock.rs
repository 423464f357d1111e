//! Mocked network layer.
//!
//! Intercepts outbound requests from the page under test via the CDP Fetch
//! domain and answers matching ones with canned JSON, so the frontend can be
//! exercised without any real backend. Non-matching requests (the page
//! document itself, assets) continue to the network untouched.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FulfillRequestParams, HeaderEntry,
    RequestId, RequestPattern, RequestStage,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;

/// A single interception rule: requests whose URL path ends with `suffix`
/// are answered with the canned response instead of reaching the network.
#[derive(Debug, Clone)]
pub struct RouteMock {
    pub suffix: String,
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl RouteMock {
    /// A 200 JSON response for any request whose path ends with `suffix`.
    pub fn json(suffix: impl Into<String>, body: &serde_json::Value) -> Self {
        Self {
            suffix: suffix.into(),
            status: 200,
            content_type: "application/json".to_string(),
            body: body.to_string(),
        }
    }

    /// Suffix match against the URL path, ignoring query string and fragment.
    pub fn matches(&self, url: &str) -> bool {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.ends_with(&self.suffix)
    }
}

/// The permissions listing the admin page renders, verbatim.
pub fn permissions_fixture() -> serde_json::Value {
    json!([
        {"id": 1, "name": "iam:permission:create", "description": "Create IAM permissions"},
        {"id": 2, "name": "iam:permission:read", "description": "Read IAM permissions"},
        {"id": 3, "name": "iam:permission:update", "description": "Update IAM permissions"},
        {"id": 4, "name": "product:product:read", "description": "Read Product permissions"}
    ])
}

/// Token-refresh response carrying the fixture credential.
pub fn refresh_fixture(token: &str) -> serde_json::Value {
    json!({ "accessToken": token })
}

/// An ordered set of route mocks installed on a page for its whole lifetime.
#[derive(Debug, Clone)]
pub struct MockRouter {
    mocks: Arc<Vec<RouteMock>>,
}

impl MockRouter {
    pub fn new(mocks: Vec<RouteMock>) -> Self {
        Self {
            mocks: Arc::new(mocks),
        }
    }

    /// The two mocks the admin verification flow needs: the IAM permissions
    /// listing and the auth token refresh.
    pub fn admin_flow(token: &str) -> Self {
        Self::new(vec![
            RouteMock::json("/iam/api/v1/permissions", &permissions_fixture()),
            RouteMock::json("/auth/api/v1/refresh", &refresh_fixture(token)),
        ])
    }

    /// Find the first mock matching a request URL.
    pub fn lookup(&self, url: &str) -> Option<&RouteMock> {
        self.mocks.iter().find(|m| m.matches(url))
    }

    /// Enable Fetch interception on the page and spawn the dispatch task.
    ///
    /// The task fulfills matching requests with the mock's canned response and
    /// continues everything else. It runs until the page's event stream ends.
    pub async fn install(&self, page: &Page) -> Result<()> {
        page.execute(EnableParams {
            patterns: Some(vec![RequestPattern {
                url_pattern: Some("*".to_string()),
                resource_type: None,
                request_stage: Some(RequestStage::Request),
            }]),
            handle_auth_requests: None,
        })
        .await?;

        let mut requests = page.event_listener::<EventRequestPaused>().await?;
        let page = page.clone();
        let mocks = Arc::clone(&self.mocks);

        tokio::spawn(async move {
            while let Some(event) = requests.next().await {
                let url = event.request.url.clone();
                let request_id = event.request_id.clone();

                let outcome = match mocks.iter().find(|m| m.matches(&url)) {
                    Some(mock) => {
                        tracing::debug!("mocking {url} ({})", mock.suffix);
                        fulfill(&page, request_id, mock).await
                    }
                    None => continue_request(&page, request_id).await,
                };

                if let Err(e) = outcome {
                    tracing::warn!("fetch interception failed for {url}: {e}");
                }
            }
        });

        Ok(())
    }
}

async fn fulfill(page: &Page, request_id: RequestId, mock: &RouteMock) -> Result<()> {
    let params = FulfillRequestParams::builder()
        .request_id(request_id)
        .response_code(i64::from(mock.status))
        .response_header(HeaderEntry {
            name: "content-type".to_string(),
            value: mock.content_type.clone(),
        })
        .body(STANDARD.encode(mock.body.as_bytes()))
        .build()
        .map_err(Error::Config)?;
    page.execute(params).await?;
    Ok(())
}

async fn continue_request(page: &Page, request_id: RequestId) -> Result<()> {
    let params = ContinueRequestParams::builder()
        .request_id(request_id)
        .build()
        .map_err(Error::Config)?;
    page.execute(params).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::FixtureToken;
    use assert_json_diff::assert_json_eq;

    #[test]
    fn suffix_match_ignores_query_string() {
        let mock = RouteMock::json("/iam/api/v1/permissions", &json!([]));
        assert!(mock.matches("http://localhost:5176/iam/api/v1/permissions"));
        assert!(mock.matches("http://localhost:5176/iam/api/v1/permissions?page=0&size=50"));
        assert!(!mock.matches("http://localhost:5176/iam/api/v1/roles"));
        assert!(!mock.matches("http://localhost:5176/iam/api/v1/permissions/1"));
    }

    #[test]
    fn permissions_body_is_the_four_record_array() {
        let router = MockRouter::admin_flow("t.t.");
        let mock = router
            .lookup("http://localhost:5176/iam/api/v1/permissions")
            .expect("no permissions mock");
        assert_eq!(mock.status, 200);
        assert_eq!(mock.content_type, "application/json");

        let body: serde_json::Value = serde_json::from_str(&mock.body).expect("body not JSON");
        assert_json_eq!(
            body,
            json!([
                {"id": 1, "name": "iam:permission:create", "description": "Create IAM permissions"},
                {"id": 2, "name": "iam:permission:read", "description": "Read IAM permissions"},
                {"id": 3, "name": "iam:permission:update", "description": "Update IAM permissions"},
                {"id": 4, "name": "product:product:read", "description": "Read Product permissions"}
            ])
        );
    }

    #[test]
    fn refresh_body_carries_the_exact_token() {
        let token = FixtureToken::admin().encode().expect("encode failed");
        let router = MockRouter::admin_flow(&token);
        let mock = router
            .lookup("http://localhost:5176/auth/api/v1/refresh")
            .expect("no refresh mock");

        let body: serde_json::Value = serde_json::from_str(&mock.body).expect("body not JSON");
        assert_eq!(body["accessToken"].as_str(), Some(token.as_str()));
    }

    #[test]
    fn lookup_returns_first_match() {
        let router = MockRouter::new(vec![
            RouteMock::json("/a/b", &json!(1)),
            RouteMock::json("/b", &json!(2)),
        ]);
        let hit = router.lookup("http://host/a/b").expect("no match");
        assert_eq!(hit.suffix, "/a/b");
    }
}
