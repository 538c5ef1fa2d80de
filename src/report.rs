//! Report formatting.
//!
//! The text report streams one line per counted file while the scan runs,
//! then a separator and the grand total. The JSON report is written once the
//! scan has finished.

use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::walker::{FileCount, IssueKind, ScanIssue, ScanObserver, ScanResult};

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Report format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Aligned per-file lines and a total (default).
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// Line printed between the per-file lines and the total.
pub const SEPARATOR: &str = "=============================";

/// Run `f` and measure how long it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Format one per-file line: right-aligned count, then the path.
///
/// # Examples
///
/// ```
/// use linebolt::report::format_file_line;
/// use linebolt::walker::FileCount;
///
/// let file = FileCount { path: "./src/main.c".into(), lines: 42 };
/// assert_eq!(format_file_line(&file), "    42 lines  ./src/main.c");
/// ```
pub fn format_file_line(file: &FileCount) -> String {
    format!("{:>6} lines  {}", file.lines, file.path.display())
}

/// Format a duration as milliseconds with two decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2} ms", elapsed.as_secs_f64() * 1000.0)
}

/// Write the closing block of the text report.
pub fn write_summary<W: Write>(
    out: &mut W,
    total: u64,
    elapsed: Option<Duration>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "Total lines: {total}")?;
    if let Some(elapsed) = elapsed {
        writeln!(out)?;
        writeln!(out, "Execution time: {}", format_elapsed(elapsed))?;
    }
    Ok(())
}

/// Streams per-file lines to a writer as files are counted.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// returned from [`TextReporter::finish`]; later lines are dropped.
pub struct TextReporter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Write the summary and flush.
    pub fn finish(
        mut self,
        result: &ScanResult,
        elapsed: Option<Duration>,
    ) -> Result<W, ReportError> {
        if let Some(e) = self.error.take() {
            return Err(e.into());
        }
        write_summary(&mut self.out, result.total, elapsed)?;
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> ScanObserver for TextReporter<W> {
    fn file_counted(&mut self, file: &FileCount) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", format_file_line(file)) {
            self.error = Some(e);
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonFile {
    path: String,
    lines: u64,
}

#[derive(Debug, Serialize)]
struct JsonIssue {
    path: String,
    kind: IssueKind,
    message: String,
}

#[derive(Debug, Serialize)]
struct JsonReport {
    root: String,
    files: Vec<JsonFile>,
    total: u64,
    issues: Vec<JsonIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
}

impl JsonReport {
    fn new(root: &Path, result: &ScanResult, elapsed: Option<Duration>) -> Self {
        Self {
            root: root.display().to_string(),
            files: result
                .files
                .iter()
                .map(|f| JsonFile {
                    path: f.path.display().to_string(),
                    lines: f.lines,
                })
                .collect(),
            total: result.total,
            issues: result.issues.iter().map(json_issue).collect(),
            elapsed_ms: elapsed.map(|d| d.as_secs_f64() * 1000.0),
        }
    }
}

fn json_issue(issue: &ScanIssue) -> JsonIssue {
    JsonIssue {
        path: issue.path.display().to_string(),
        kind: issue.kind,
        message: issue.message.clone(),
    }
}

/// Render a finished scan as pretty-printed JSON.
pub fn format_json(
    root: &Path,
    result: &ScanResult,
    elapsed: Option<Duration>,
) -> Result<String, ReportError> {
    let report = JsonReport::new(root, result, elapsed);
    Ok(serde_json::to_string_pretty(&report)?)
}
