use reqwest::header::ACCEPT;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::github::issue::Issue;

const USER_AGENT: &str = concat!("project-dashboard/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

pub struct GitHubClient {
  http: reqwest::Client,
  api_base: String,
  token: Option<String>,
}

impl GitHubClient {
  pub fn new(config: &Config) -> Result<Self> {
    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    if config.token.is_none() {
      warn!("GITHUB_TOKEN not set, requesting issues unauthenticated");
    }

    Ok(Self {
      http,
      api_base: config.api_base.trim_end_matches('/').to_string(),
      token: config.token.clone(),
    })
  }

  fn issues_url(&self, owner: &str, repo: &str) -> String {
    format!("{}/repos/{owner}/{repo}/issues", self.api_base)
  }

  /// All states, newest-updated first. Only the first page is requested.
  fn list_request(
    &self,
    owner: &str,
    repo: &str,
    label: &str,
    per_page: u16,
  ) -> reqwest::RequestBuilder {
    let request = self
      .http
      .get(self.issues_url(owner, repo))
      .header(ACCEPT, GITHUB_JSON)
      .query(&[
        ("state", "all"),
        ("labels", label),
        ("sort", "updated"),
        ("direction", "desc"),
        ("per_page", per_page.to_string().as_str()),
      ]);

    match &self.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    }
  }

  pub async fn fetch_issues(
    &self,
    owner: &str,
    repo: &str,
    label: &str,
    per_page: u16,
  ) -> Result<Vec<Issue>> {
    info!("fetching issues for {owner}/{repo} with label={label}");

    let response = self.list_request(owner, repo, label, per_page).send().await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(DashboardError::GitHub(format!(
        "list issues for {owner}/{repo} failed with {status}: {body}"
      )));
    }

    let issues: Vec<Issue> = response.json().await?;
    info!("found {} issues", issues.len());
    Ok(issues)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::header::AUTHORIZATION;
  use std::io::{Read, Write};
  use std::net::TcpListener;

  /// Answers a single request on a local port with the given status and body.
  fn serve_once(status: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
      "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
      body.len()
    );

    std::thread::spawn(move || {
      let (mut stream, _) = listener.accept().unwrap();
      let mut request = Vec::new();
      let mut chunk = [0u8; 1024];
      while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
          break;
        }
        request.extend_from_slice(&chunk[..n]);
      }
      stream.write_all(response.as_bytes()).unwrap();
    });

    format!("http://{addr}")
  }

  fn client(token: Option<&str>, api_base: &str) -> GitHubClient {
    let config = Config {
      token: token.map(String::from),
      api_base: api_base.into(),
      ..Config::default()
    };
    GitHubClient::new(&config).unwrap()
  }

  #[test]
  fn test_list_request_url_and_query() {
    let request = client(Some("ghp_abc"), "https://api.github.com/")
      .list_request("acme", "roadmap", "project", 30)
      .build()
      .unwrap();

    assert_eq!(request.method(), reqwest::Method::GET);
    assert_eq!(request.url().path(), "/repos/acme/roadmap/issues");
    assert_eq!(
      request.url().query(),
      Some("state=all&labels=project&sort=updated&direction=desc&per_page=30")
    );
    assert_eq!(request.headers()[ACCEPT], GITHUB_JSON);
    assert_eq!(request.headers()[AUTHORIZATION], "Bearer ghp_abc");
  }

  #[test]
  fn test_list_request_without_token() {
    let request = client(None, "https://github.example.com/api/v3")
      .list_request("acme", "roadmap", "project", 100)
      .build()
      .unwrap();

    assert_eq!(request.url().path(), "/api/v3/repos/acme/roadmap/issues");
    assert!(request.headers().get(AUTHORIZATION).is_none());
  }

  #[tokio::test]
  async fn test_fetch_issues_success() {
    let body = r#"[{"id": 1, "number": 3, "title": "App", "body": null, "labels": [{"name": "project"}], "updated_at": "2025-03-04T00:00:00Z", "html_url": "https://github.com/acme/roadmap/issues/3"}]"#;
    let base = serve_once("200 OK", body);

    let issues = client(Some("ghp_abc"), &base)
      .fetch_issues("acme", "roadmap", "project", 30)
      .await
      .unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].title, "App");
  }

  #[tokio::test]
  async fn test_fetch_issues_non_success_status_is_github_error() {
    let base = serve_once("404 Not Found", r#"{"message": "Not Found"}"#);

    let err = client(Some("ghp_abc"), &base)
      .fetch_issues("acme", "missing", "project", 30)
      .await
      .unwrap_err();
    match err {
      DashboardError::GitHub(message) => {
        assert!(message.contains("404"), "{message}");
        assert!(message.contains("acme/missing"), "{message}");
      }
      other => panic!("expected github error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_fetch_issues_connection_refused_is_http_error() {
    let addr = TcpListener::bind("127.0.0.1:0")
      .unwrap()
      .local_addr()
      .unwrap();

    let err = client(None, &format!("http://{addr}"))
      .fetch_issues("acme", "roadmap", "project", 30)
      .await
      .unwrap_err();
    assert!(matches!(err, DashboardError::Http(_)), "{err:?}");
  }
}
