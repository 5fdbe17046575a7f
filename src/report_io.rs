//! Pulse report log: one JSON report per line, so a long-running host can append
//! reports as pulses finish.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::ReportIoError;
use crate::types::PulseReport;

/// Default filename for the report log under a run directory.
pub const REPORTS_FILENAME: &str = "pulses.jsonl";

/// Writes `reports` to `path`, replacing any existing log and creating parent
/// directories.
#[instrument(level = "trace", skip(path, reports))]
pub fn save_reports(path: &Path, reports: &[PulseReport]) -> Result<(), ReportIoError> {
  write_reports(path, reports, false)
}

/// Appends `reports` to the log at `path`, creating it when missing.
#[instrument(level = "trace", skip(path, reports))]
pub fn append_reports(path: &Path, reports: &[PulseReport]) -> Result<(), ReportIoError> {
  write_reports(path, reports, true)
}

/// Loads every report in the log, in the order written. Blank lines are skipped.
#[instrument(level = "trace", skip(path))]
pub fn load_reports(path: &Path) -> Result<Vec<PulseReport>, ReportIoError> {
  let io = |source| ReportIoError::Io {
    path: path.to_path_buf(),
    source,
  };
  let reader = BufReader::new(File::open(path).map_err(io)?);
  let mut reports = Vec::new();
  for (index, line) in reader.lines().enumerate() {
    let line = line.map_err(io)?;
    if line.trim().is_empty() {
      continue;
    }
    let report = serde_json::from_str(&line).map_err(|source| ReportIoError::Parse {
      path: path.to_path_buf(),
      line: index + 1,
      source,
    })?;
    reports.push(report);
  }
  Ok(reports)
}

fn write_reports(path: &Path, reports: &[PulseReport], append: bool) -> Result<(), ReportIoError> {
  let io = |source| ReportIoError::Io {
    path: path.to_path_buf(),
    source,
  };
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).map_err(io)?;
  }
  let file = OpenOptions::new()
    .create(true)
    .write(true)
    .append(append)
    .truncate(!append)
    .open(path)
    .map_err(io)?;
  let mut out = BufWriter::new(file);
  for report in reports {
    serde_json::to_writer(&mut out, report)?;
    out.write_all(b"\n").map_err(io)?;
  }
  out.flush().map_err(io)?;
  debug!(path = %path.display(), count = reports.len(), append, "pulse reports written");
  Ok(())
}
