//! Linebolt - count lines in source trees.
//!
//! Linebolt walks a directory tree depth-first with an explicit work stack,
//! counts lines in files whose names end in an allowed suffix, skips
//! build and version-control directories wherever they appear, and reports
//! per-file counts and a grand total.
//!
//! # Quick Start
//!
//! ```no_run
//! use linebolt::{scan, ScanConfig};
//! use std::path::Path;
//!
//! let result = scan(Path::new("."), &ScanConfig::default()).unwrap();
//! for file in &result.files {
//!     println!("{:>6} lines  {}", file.lines, file.path.display());
//! }
//! println!("Total lines: {}", result.total);
//! ```
//!
//! # Modules
//!
//! - [`counter`] - Streaming line counting
//! - [`filter`] - File suffix allow-list and directory deny-list
//! - [`walker`] - Iterative directory traversal
//! - [`config`] - Scan configuration and TOML loading
//! - [`report`] - Text and JSON reports
//!
//! # Counting rule
//!
//! A line is text terminated by `\n`, or the final unterminated fragment of a
//! non-empty file. An empty file has zero lines.

pub mod config;
pub mod counter;
pub mod errors;
pub mod filter;
pub mod report;
pub mod walker;

// Re-export key types at crate root for convenience
pub use config::{ConfigError, ScanConfig};
pub use counter::{count_bytes, count_lines};
pub use errors::LineboltError;
pub use filter::{DirectoryFilter, FileClassifier};
pub use report::{ReportError, ReportFormat, TextReporter};
pub use walker::{
    scan, scan_with_observer, FileCount, IssueKind, ScanIssue, ScanObserver, ScanResult, WalkError,
};
