mod config;
mod error;
mod github;
mod pipeline;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::github::client::GitHubClient;
use crate::pipeline::{build, splice, RecordSummary};

#[derive(Parser)]
#[command(
  name = "project-dashboard",
  about = "Render project issues from GitHub into the dashboard page"
)]
struct Cli {
  /// Path to config file
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Repository to read issues from (owner/repo)
  #[arg(long)]
  repo: Option<String>,

  /// Dashboard page to update
  #[arg(long)]
  page: Option<PathBuf>,

  /// Print the updated page instead of writing it
  #[arg(long)]
  dry_run: bool,

  /// Report the projects currently embedded in the page, without fetching
  #[arg(long, conflicts_with = "dry_run")]
  check: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let cli = Cli::parse();

  if let Err(e) = run(cli).await {
    error!("{e}");
    std::process::exit(1);
  }
}

async fn run(cli: Cli) -> Result<()> {
  let config = load_config(&cli)?;

  if cli.check {
    return cmd_check(&config);
  }
  cmd_generate(&config, cli.dry_run).await
}

fn load_config(cli: &Cli) -> Result<Config> {
  let mut config = Config::load(cli.config.as_deref())?;
  config.apply_env(|key| std::env::var(key).ok());
  if let Some(repo) = &cli.repo {
    config.repository = repo.clone();
  }
  if let Some(page) = &cli.page {
    config.page = page.clone();
  }
  config.validate()?;
  Ok(config)
}

fn read_page(path: &Path) -> Result<String> {
  std::fs::read_to_string(path)
    .map_err(|e| DashboardError::Page(format!("failed to read {}: {e}", path.display())))
}

async fn cmd_generate(config: &Config, dry_run: bool) -> Result<()> {
  info!("generating dashboard from {} issues", config.repository);

  let page = read_page(&config.page)?;

  let client = GitHubClient::new(config)?;
  let (owner, repo) = config.owner_repo();
  let issues = client
    .fetch_issues(owner, repo, &config.label, config.per_page)
    .await?;

  let records = build::build_records(&issues, config);
  info!(
    "built {} project(s): {}",
    records.len(),
    RecordSummary::of(&records)
  );

  let updated = splice::splice(&page, &records, chrono::Local::now().naive_local())?;

  if dry_run {
    print!("{updated}");
    return Ok(());
  }

  std::fs::write(&config.page, updated)?;
  info!("updated {}", config.page.display());
  Ok(())
}

fn cmd_check(config: &Config) -> Result<()> {
  let page = read_page(&config.page)?;

  let Some(records) = splice::extract(&page)? else {
    return Err(DashboardError::Page(format!(
      "`{}` not found in {}",
      splice::OPEN_MARKER,
      config.page.display()
    )));
  };

  info!(
    "{} embeds {} project(s): {}",
    config.page.display(),
    records.len(),
    RecordSummary::of(&records)
  );
  for record in &records {
    info!("  [{}] {} ({})", record.status, record.title, record.id);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use tempfile::TempDir;

  const PAGE: &str = "<p>マスターのためのプロジェクト管理ダッシュボード</p>\n<script>\nconst projects = [\n];\n</script>\n";

  #[test]
  fn test_read_page_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html");

    let err = read_page(&path).unwrap_err();
    match err {
      DashboardError::Page(message) => assert!(message.contains("index.html"), "{message}"),
      other => panic!("expected page error, got {other:?}"),
    }
  }

  #[test]
  fn test_page_update_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html");
    std::fs::write(&path, PAGE).unwrap();

    let now = NaiveDate::from_ymd_opt(2025, 3, 4)
      .unwrap()
      .and_hms_opt(9, 0, 0)
      .unwrap();
    let updated = splice::splice(&read_page(&path).unwrap(), &[], now).unwrap();
    std::fs::write(&path, &updated).unwrap();

    let page = read_page(&path).unwrap();
    assert!(page.contains("最終更新: 2025-03-04 09:00:00"));
    assert_eq!(splice::extract(&page).unwrap(), Some(vec![]));
  }

  #[test]
  fn test_cmd_check_without_marker_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html");
    std::fs::write(&path, "<html></html>").unwrap();
    let config = Config {
      page: path,
      ..Config::default()
    };

    assert!(matches!(cmd_check(&config), Err(DashboardError::Page(_))));
  }
}
