pub mod build;
pub mod parse;
pub mod splice;
pub mod status;

use crate::pipeline::build::DisplayRecord;
use crate::pipeline::status::Status;

#[derive(Debug, Default, PartialEq)]
pub struct RecordSummary {
  pub planned: usize,
  pub in_progress: usize,
  pub completed: usize,
}

impl RecordSummary {
  pub fn of(records: &[DisplayRecord]) -> Self {
    let mut summary = Self::default();
    for record in records {
      match record.status {
        Status::Planned => summary.planned += 1,
        Status::InProgress => summary.in_progress += 1,
        Status::Completed => summary.completed += 1,
      }
    }
    summary
  }
}

impl std::fmt::Display for RecordSummary {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "planned={}, in_progress={}, completed={}",
      self.planned, self.in_progress, self.completed
    )
  }
}
