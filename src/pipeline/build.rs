use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::github::issue::Issue;
use crate::pipeline::parse::{self, ParsedFields};
use crate::pipeline::status::{self, Status};

const DEMO_LABEL: &str = "🚀 開く";
const REPO_LABEL: &str = "📁 GitHub";
const ISSUE_LABEL: &str = "💬 Issue";
const CURRENT_TASK_PREFIX: &str = "🔵 作業中: ";
const BLOCKERS_PREFIX: &str = "🔴 課題: ";

/// One project card on the dashboard page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayRecord {
  pub id: u64,
  pub title: String,
  pub description: String,
  pub status: Status,
  pub tags: Vec<String>,
  pub links: Vec<Link>,
  pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
  Primary,
  Secondary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
  #[serde(rename = "type")]
  pub kind: LinkKind,
  pub label: String,
  pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
  pub text: String,
  pub date: String,
}

impl Link {
  fn new(kind: LinkKind, label: &str, url: &str) -> Self {
    Self {
      kind,
      label: label.to_string(),
      url: url.to_string(),
    }
  }
}

pub fn build_records(issues: &[Issue], config: &Config) -> Vec<DisplayRecord> {
  let records: Vec<DisplayRecord> = issues
    .iter()
    .filter(|issue| !issue.is_pull_request())
    .map(|issue| build_record(issue, config))
    .collect();

  let skipped = issues.len() - records.len();
  if skipped > 0 {
    debug!("skipped {skipped} pull request(s)");
  }
  records
}

pub fn build_record(issue: &Issue, config: &Config) -> DisplayRecord {
  let fields = parse::parse_body(issue.body());
  let date = issue.updated_at.format("%Y-%m-%d").to_string();
  let status = status::resolve(issue.label_names(), &config.status_labels);

  if !fields.status_text.is_empty() {
    debug!("{issue}: body status {:?}, label status {status}", fields.status_text);
  }

  DisplayRecord {
    id: issue.id,
    title: title(&issue.title, &config.title_prefix, &fields),
    description: description(&fields, issue.body()),
    status,
    tags: split_tags(&fields.tags),
    links: links(&fields, &issue.html_url),
    comments: comments(&fields, &date),
  }
}

fn strip_title_prefix<'a>(title: &'a str, prefix: &str) -> &'a str {
  if prefix.is_empty() {
    return title;
  }
  title
    .strip_prefix(prefix)
    .map(str::trim_start)
    .unwrap_or(title)
}

/// Falls back to the project name when nothing is left after the prefix.
fn title(raw: &str, prefix: &str, fields: &ParsedFields) -> String {
  let title = strip_title_prefix(raw, prefix);
  if title.is_empty() {
    fields.project_name.clone()
  } else {
    title.to_string()
  }
}

/// Without a description section, a plain first body line stands in; a
/// leading heading never does.
fn description(fields: &ParsedFields, body: &str) -> String {
  if !fields.description.is_empty() {
    return fields.description.clone();
  }
  match body.lines().next().map(str::trim) {
    Some(line) if !parse::is_heading(line) => line.to_string(),
    _ => String::new(),
  }
}

fn split_tags(tags: &str) -> Vec<String> {
  tags
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(String::from)
    .collect()
}

fn links(fields: &ParsedFields, issue_url: &str) -> Vec<Link> {
  let mut links = Vec::new();
  if !fields.demo_url.is_empty() {
    links.push(Link::new(LinkKind::Primary, DEMO_LABEL, &fields.demo_url));
  }
  if !fields.repo_url.is_empty() {
    links.push(Link::new(LinkKind::Secondary, REPO_LABEL, &fields.repo_url));
  }
  links.push(Link::new(LinkKind::Secondary, ISSUE_LABEL, issue_url));
  links
}

fn comments(fields: &ParsedFields, date: &str) -> Vec<Comment> {
  [
    (CURRENT_TASK_PREFIX, &fields.current_task),
    (BLOCKERS_PREFIX, &fields.blockers),
  ]
  .into_iter()
  .filter(|(_, value)| !value.is_empty())
  .map(|(prefix, value)| Comment {
    text: format!("{prefix}{value}"),
    date: date.to_string(),
  })
  .collect()
}
