use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
  #[error("config error: {0}")]
  Config(String),

  #[error("config file not found: {0}")]
  ConfigNotFound(PathBuf),

  #[error("github error: {0}")]
  GitHub(String),

  #[error("page error: {0}")]
  Page(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("yaml error: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
