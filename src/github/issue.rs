use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Label {
  pub name: String,
}

/// Subset of the REST issue schema the dashboard reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
  pub id: u64,
  pub number: u64,
  pub title: String,
  #[serde(default)]
  pub body: Option<String>,
  #[serde(default)]
  pub labels: Vec<Label>,
  pub updated_at: DateTime<Utc>,
  pub html_url: String,
  /// Pull requests also come through the issues endpoint
  #[serde(default)]
  pub pull_request: Option<serde_json::Value>,
}

impl Issue {
  pub fn is_pull_request(&self) -> bool {
    self.pull_request.is_some()
  }

  pub fn body(&self) -> &str {
    self.body.as_deref().unwrap_or_default()
  }

  pub fn label_names(&self) -> impl Iterator<Item = &str> {
    self.labels.iter().map(|l| l.name.as_str())
  }
}

impl std::fmt::Display for Issue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "#{}: {}", self.number, self.title)
  }
}
