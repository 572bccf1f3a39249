use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{DashboardError, Result};
use crate::pipeline::build::DisplayRecord;

pub const OPEN_MARKER: &str = "const projects = [";
pub const CLOSE_MARKER: &str = "];";
pub const ANCHOR: &str = "<p>マスターのためのプロジェクト管理ダッシュボード</p>";

const ASSIGNMENT: &str = "const projects = ";
const JSON_INDENT: &[u8] = b"        ";
const STAMP_INDENT: &str = "\n                ";
const STAMP_OPEN: &str =
  "<p style=\"font-size: 0.8rem; color: #718096; margin-top: 5px;\">最終更新: ";
const STAMP_CLOSE: &str = "</p>";
const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Byte range of `const projects = [ ... ];`, markers included.
fn marker_span(page: &str) -> Option<(usize, usize)> {
  let start = page.find(OPEN_MARKER)?;
  let close = page[start..].find(CLOSE_MARKER)?;
  Some((start, start + close + CLOSE_MARKER.len()))
}

/// Pretty JSON safe to embed in a `<script>` block. `<` and a `;` after `]`
/// can only occur inside string values, where their `\u` escapes are
/// equivalent.
pub fn serialize_records(records: &[DisplayRecord]) -> Result<String> {
  let mut buf = Vec::new();
  let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
  records.serialize(&mut ser)?;
  let json = String::from_utf8(buf)
    .map_err(|e| DashboardError::Page(format!("serialized records are not utf-8: {e}")))?;

  Ok(json.replace('<', "\\u003c").replace("];", "]\\u003b"))
}

/// Replaces the embedded record list and refreshes the "last updated" line.
/// A page without the marker pair comes back unchanged.
pub fn splice(page: &str, records: &[DisplayRecord], now: NaiveDateTime) -> Result<String> {
  let Some((start, end)) = marker_span(page) else {
    return Ok(page.to_string());
  };

  let json = serialize_records(records)?;
  let spliced = format!("{}{ASSIGNMENT}{json};{}", &page[..start], &page[end..]);

  Ok(stamp(&spliced, now))
}

fn stamp(page: &str, now: NaiveDateTime) -> String {
  let Some(pos) = page.find(ANCHOR) else {
    return page.to_string();
  };
  let (head, rest) = page.split_at(pos + ANCHOR.len());

  format!(
    "{head}{STAMP_INDENT}{STAMP_OPEN}{}{STAMP_CLOSE}{}",
    now.format(STAMP_FORMAT),
    strip_stamps(rest)
  )
}

/// Drops stamp lines directly following the anchor. Older pages may carry
/// several.
fn strip_stamps(mut rest: &str) -> &str {
  loop {
    let Some(after_open) = rest.trim_start().strip_prefix(STAMP_OPEN) else {
      return rest;
    };
    let Some(close) = after_open.find(STAMP_CLOSE) else {
      return rest;
    };
    rest = &after_open[close + STAMP_CLOSE.len()..];
  }
}

/// Record list currently embedded in the page, or `None` without markers.
pub fn extract(page: &str) -> Result<Option<Vec<DisplayRecord>>> {
  let Some((start, end)) = marker_span(page) else {
    return Ok(None);
  };
  // keep the `[` of the open marker and the `]` of the close marker
  let json = &page[start + ASSIGNMENT.len()..end - 1];
  Ok(Some(serde_json::from_str(json)?))
}
