use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::pipeline::status::Status;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// `owner/name` of the repository whose issues feed the dashboard
  pub repository: String,
  #[serde(skip)]
  pub token: Option<String>,
  pub api_base: String,
  /// Only issues carrying this label are fetched
  pub label: String,
  pub per_page: u16,
  /// HTML page that is both template and output
  pub page: PathBuf,
  pub title_prefix: String,
  /// Checked in order; the first label an issue carries decides its status
  pub status_labels: Vec<StatusLabel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusLabel {
  pub label: String,
  pub status: Status,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      repository: default_repository(),
      token: None,
      api_base: default_api_base(),
      label: default_label(),
      per_page: default_per_page(),
      page: default_page(),
      title_prefix: default_title_prefix(),
      status_labels: default_status_labels(),
    }
  }
}

fn default_repository() -> String {
  "bocchan1802-ui/project-dashboard".to_string()
}
fn default_api_base() -> String {
  "https://api.github.com".to_string()
}
fn default_label() -> String {
  "project".to_string()
}
fn default_per_page() -> u16 {
  30
}
fn default_page() -> PathBuf {
  PathBuf::from("index.html")
}
fn default_title_prefix() -> String {
  "[プロジェクト]".to_string()
}
fn default_status_labels() -> Vec<StatusLabel> {
  [
    ("status:planned", Status::Planned),
    ("status:in-progress", Status::InProgress),
    ("status:completed", Status::Completed),
    ("status:hold", Status::Planned),
  ]
  .into_iter()
  .map(|(label, status)| StatusLabel {
    label: label.to_string(),
    status,
  })
  .collect()
}

impl Config {
  /// Defaults, overlaid with the YAML file when one is given.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    if !path.exists() {
      return Err(DashboardError::ConfigNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
  }

  pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
    if let Some(token) = var(TOKEN_ENV).filter(|t| !t.is_empty()) {
      self.token = Some(token);
    }
    if let Some(repository) = var(REPOSITORY_ENV).filter(|r| !r.is_empty()) {
      self.repository = repository;
    }
  }

  pub fn validate(&self) -> Result<()> {
    match self.repository.split_once('/') {
      Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
      _ => {
        return Err(DashboardError::Config(format!(
          "repository must be in owner/repo format: {}",
          self.repository
        )));
      }
    }
    if !(1..=100).contains(&self.per_page) {
      return Err(DashboardError::Config(format!(
        "per_page must be between 1 and 100: {}",
        self.per_page
      )));
    }
    if self.api_base.trim().is_empty() {
      return Err(DashboardError::Config("api_base is empty".into()));
    }
    Ok(())
  }

  pub fn owner_repo(&self) -> (&str, &str) {
    self
      .repository
      .split_once('/')
      .unwrap_or((self.repository.as_str(), ""))
  }
}
