//! Heading-delimited field extraction from issue bodies.
//!
//! A body looks like:
//!
//! ```text
//! ### プロジェクト名
//! Dashboard
//!
//! ### デモURL
//! https://example.com
//! ```
//!
//! Each `###` heading opens a section whose non-blank lines form the value of
//! the field the heading maps to. Unknown headings are dropped with their
//! content, and nothing here ever fails.

const HEADING_MARKER: &str = "###";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  ProjectName,
  Description,
  StatusText,
  CurrentTask,
  Blockers,
  Tags,
  DemoUrl,
  RepoUrl,
}

impl Field {
  pub const ALL: [Field; 8] = [
    Field::ProjectName,
    Field::Description,
    Field::StatusText,
    Field::CurrentTask,
    Field::Blockers,
    Field::Tags,
    Field::DemoUrl,
    Field::RepoUrl,
  ];

  pub fn key(self) -> &'static str {
    match self {
      Field::ProjectName => "project_name",
      Field::Description => "description",
      Field::StatusText => "status_text",
      Field::CurrentTask => "current_task",
      Field::Blockers => "blockers",
      Field::Tags => "tags",
      Field::DemoUrl => "demo_url",
      Field::RepoUrl => "repo_url",
    }
  }
}

/// Tested in order; the first keyword contained in a heading wins.
const KEYWORDS: &[(&str, Field)] = &[
  ("プロジェクト名", Field::ProjectName),
  ("説明", Field::Description),
  ("概要", Field::Description),
  ("ステータス", Field::StatusText),
  ("状態", Field::StatusText),
  ("作業中", Field::CurrentTask),
  ("現在の作業", Field::CurrentTask),
  ("現在のタスク", Field::CurrentTask),
  ("ブロッカー", Field::Blockers),
  ("課題", Field::Blockers),
  ("タグ", Field::Tags),
  ("デモ", Field::DemoUrl),
  ("リポジトリ", Field::RepoUrl),
];

/// Maps heading text to a field. Japanese keywords are matched by containment;
/// otherwise a heading spelled as the field key (`Demo URL` -> `demo_url`) is
/// accepted.
pub fn classify_heading(heading: &str) -> Option<Field> {
  if let Some((_, field)) = KEYWORDS.iter().find(|(kw, _)| heading.contains(kw)) {
    return Some(*field);
  }
  let normalized = heading.to_lowercase().replace(' ', "_");
  Field::ALL.into_iter().find(|f| f.key() == normalized)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
  pub project_name: String,
  pub description: String,
  pub status_text: String,
  pub current_task: String,
  pub blockers: String,
  pub tags: String,
  pub demo_url: String,
  pub repo_url: String,
}

impl ParsedFields {
  fn slot(&mut self, field: Field) -> &mut String {
    match field {
      Field::ProjectName => &mut self.project_name,
      Field::Description => &mut self.description,
      Field::StatusText => &mut self.status_text,
      Field::CurrentTask => &mut self.current_task,
      Field::Blockers => &mut self.blockers,
      Field::Tags => &mut self.tags,
      Field::DemoUrl => &mut self.demo_url,
      Field::RepoUrl => &mut self.repo_url,
    }
  }
}

enum State<'a> {
  ScanningForHeading,
  /// `field` is `None` for a heading that maps to nothing; its lines are
  /// collected and then discarded.
  CollectingValue {
    field: Option<Field>,
    lines: Vec<&'a str>,
  },
}

pub fn is_heading(line: &str) -> bool {
  line.trim_start().starts_with(HEADING_MARKER)
}

fn heading_text(line: &str) -> Option<&str> {
  line
    .starts_with(HEADING_MARKER)
    .then(|| line.trim_start_matches('#').trim())
}

pub fn parse_body(body: &str) -> ParsedFields {
  let mut fields = ParsedFields::default();

  let end = body
    .lines()
    .map(str::trim)
    .fold(State::ScanningForHeading, |state, line| {
      match (state, heading_text(line)) {
        (State::CollectingValue { field, lines }, Some(heading)) => {
          commit(&mut fields, field, &lines);
          open(heading)
        }
        (State::ScanningForHeading, Some(heading)) => open(heading),
        (State::ScanningForHeading, None) => State::ScanningForHeading,
        (State::CollectingValue { field, mut lines }, None) => {
          if !line.is_empty() {
            lines.push(line);
          }
          State::CollectingValue { field, lines }
        }
      }
    });

  if let State::CollectingValue { field, lines } = end {
    commit(&mut fields, field, &lines);
  }

  fields
}

fn open(heading: &str) -> State<'_> {
  State::CollectingValue {
    field: classify_heading(heading),
    lines: Vec::new(),
  }
}

fn commit(fields: &mut ParsedFields, field: Option<Field>, lines: &[&str]) {
  if let Some(field) = field {
    *fields.slot(field) = lines.join("\n");
  }
}
