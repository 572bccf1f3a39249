use serde::{Deserialize, Serialize};

use crate::config::StatusLabel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
  #[default]
  Planned,
  InProgress,
  Completed,
}

impl std::fmt::Display for Status {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Status::Planned => "planned",
      Status::InProgress => "in-progress",
      Status::Completed => "completed",
    };
    f.write_str(s)
  }
}

/// Status of the first label (in issue order) that appears in `table`.
pub fn resolve<'a>(labels: impl IntoIterator<Item = &'a str>, table: &[StatusLabel]) -> Status {
  labels
    .into_iter()
    .find_map(|label| table.iter().find(|s| s.label == label).map(|s| s.status))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;

  fn table() -> Vec<StatusLabel> {
    Config::default().status_labels
  }

  #[test]
  fn test_each_known_label() {
    let cases = [
      ("status:planned", Status::Planned),
      ("status:in-progress", Status::InProgress),
      ("status:completed", Status::Completed),
      ("status:hold", Status::Planned),
    ];
    for (label, expected) in cases {
      assert_eq!(resolve(["project", label], &table()), expected, "{label}");
    }
  }

  #[test]
  fn test_completed_scenario() {
    assert_eq!(
      resolve(["status:completed", "project"], &table()),
      Status::Completed
    );
  }

  #[test]
  fn test_hold_is_planned() {
    assert_eq!(resolve(["status:hold", "project"], &table()), Status::Planned);
  }

  #[test]
  fn test_unknown_or_absent_labels_default_to_planned() {
    assert_eq!(resolve(["project", "bug"], &table()), Status::Planned);
    assert_eq!(resolve(Vec::<&str>::new(), &table()), Status::Planned);
  }

  #[test]
  fn test_first_matching_label_wins() {
    assert_eq!(
      resolve(["status:in-progress", "status:completed"], &table()),
      Status::InProgress
    );
    assert_eq!(
      resolve(["status:completed", "status:in-progress"], &table()),
      Status::Completed
    );
  }

  #[test]
  fn test_label_match_is_exact() {
    assert_eq!(resolve(["Status:Completed"], &table()), Status::Planned);
  }

  #[test]
  fn test_serialized_names() {
    assert_eq!(
      serde_json::to_string(&Status::InProgress).unwrap(),
      "\"in-progress\""
    );
    assert_eq!(Status::Completed.to_string(), "completed");
  }
}
