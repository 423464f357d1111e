//! End-to-end runs of the verification scenario against a wiremock-served
//! miniature app: a login page exposing the `__setAccessToken` dev hook and
//! an admin page that reveals its heading once the (mocked) permissions API
//! answers.

use std::time::Duration;
use url::Url;
use vantage::scenario::{self, Outcome, VerifyConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Sign in</title></head>
  <body>
    <h1>Sign in</h1>
    <script>
      window.__setAccessToken = (token) => {
        window.localStorage.setItem('accessToken', token);
        window.__hasToken = true;
        console.log('access token installed');
      };
    </script>
  </body>
</html>"#;

/// Admin page whose heading stays hidden until the permissions call answers,
/// so reaching it proves the route mock fulfilled the request.
const ADMIN_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Admin</title></head>
  <body>
    <h1 id="title" style="display:none">Manage Permissions</h1>
    <ul id="rows"></ul>
    <script>
      fetch('/iam/api/v1/permissions')
        .then((r) => r.json())
        .then((rows) => {
          const list = document.getElementById('rows');
          for (const row of rows) {
            const item = document.createElement('li');
            item.textContent = row.name;
            list.appendChild(item);
          }
          document.getElementById('title').style.display = 'block';
        });
    </script>
  </body>
</html>"#;

/// Admin page where the heading never appears, to force a wait timeout.
const ADMIN_PAGE_STUCK: &str = r#"<!doctype html>
<html>
  <head><title>Admin</title></head>
  <body>
    <h1 style="display:none">Manage Permissions</h1>
  </body>
</html>"#;

async fn serve_app(admin_page: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LOGIN_PAGE, "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(admin_page, "text/html"))
        .mount(&server)
        .await;

    server
}

fn config_for(server: &MockServer, out_dir: &std::path::Path) -> VerifyConfig {
    let mut config = VerifyConfig::new(Url::parse(&server.uri()).expect("server URI"));
    config.out_dir = out_dir.to_path_buf();
    config.quiet = true;
    config
}

#[tokio::test]
#[ignore] // Requires Chromium to be installed
async fn full_flow_passes_and_writes_success_screenshot() {
    let server = serve_app(ADMIN_PAGE).await;
    let out = tempfile::tempdir().expect("tempdir");

    let mut config = config_for(&server, out.path());
    config.wait_timeout = Duration::from_secs(30);

    let outcome = scenario::run(&config).await.expect("run failed");
    assert_eq!(outcome, Outcome::Passed);

    let screenshot = config.success_path();
    let meta = std::fs::metadata(&screenshot).expect("no success screenshot");
    assert!(meta.len() > 0);
    assert!(!config.timeout_path().exists());
    assert!(!config.error_path().exists());
}

#[tokio::test]
#[ignore] // Requires Chromium to be installed
async fn hidden_heading_times_out_and_writes_timeout_screenshot() {
    let server = serve_app(ADMIN_PAGE_STUCK).await;
    let out = tempfile::tempdir().expect("tempdir");

    let mut config = config_for(&server, out.path());
    // Short bound so the heading wait expires quickly
    config.wait_timeout = Duration::from_secs(3);

    let outcome = scenario::run(&config).await.expect("run failed");
    assert_eq!(outcome, Outcome::TimedOut);

    let meta = std::fs::metadata(config.timeout_path()).expect("no timeout screenshot");
    assert!(meta.len() > 0);
    assert!(!config.success_path().exists());
}
