//! Directory traversal and line accumulation.
//!
//! The walk is iterative: pending directories live on an explicit, growable
//! stack owned by the scan call, so tree depth never touches the call stack.
//! Each directory is listed in full and its handle released before any of its
//! entries are processed.
//!
//! Only the root can fail the scan. Every later failure (a directory that
//! cannot be opened, an entry whose metadata cannot be read, a file that
//! cannot be read) is logged, recorded as a [`ScanIssue`] and skipped.
//! Symbolic links, devices, sockets and FIFOs are ignored without comment.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::counter::count_lines;
use crate::filter::{DirectoryFilter, FileClassifier};

/// Errors that end a scan. Only raised for the root directory.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => WalkError::NotFound { path },
            io::ErrorKind::PermissionDenied => WalkError::PermissionDenied { path },
            _ if path.exists() && !path.is_dir() => WalkError::NotADirectory { path },
            _ => WalkError::Io { path, source },
        }
    }
}

/// Where a recoverable failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A subdirectory could not be opened; none of its contents were visited.
    OpenDirectory,
    /// Listing an opened directory failed part way.
    ReadEntry,
    /// An entry's metadata could not be read.
    Metadata,
    /// A file could not be opened or read; it counts as zero lines.
    OpenFile,
}

impl IssueKind {
    fn describe(self) -> &'static str {
        match self {
            IssueKind::OpenDirectory => "cannot open directory",
            IssueKind::ReadEntry => "cannot read directory entry",
            IssueKind::Metadata => "cannot read metadata",
            IssueKind::OpenFile => "cannot read file",
        }
    }
}

/// A recoverable failure met during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanIssue {
    pub path: PathBuf,
    pub kind: IssueKind,
    /// OS-reported reason.
    pub message: String,
}

/// Line count of one in-scope file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCount {
    pub path: PathBuf,
    pub lines: u64,
}

/// Everything a finished scan produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Counted files in discovery order.
    pub files: Vec<FileCount>,
    /// Sum of `lines` over `files`.
    pub total: u64,
    /// Recoverable failures in the order they happened.
    pub issues: Vec<ScanIssue>,
}

impl ScanResult {
    /// Number of files counted.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Whether the scan met no recoverable failures.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Receives scan events as they happen.
///
/// Both methods default to doing nothing.
pub trait ScanObserver {
    fn file_counted(&mut self, _file: &FileCount) {}

    fn issue(&mut self, _issue: &ScanIssue) {}
}

impl ScanObserver for () {}

/// Resolved type of a directory entry. Links are never resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One entry of a listed directory, dispatched then dropped.
#[derive(Debug)]
struct FileEntry {
    name: OsString,
    path: PathBuf,
    kind: EntryKind,
}

impl FileEntry {
    fn resolve(parent: &Path, name: OsString) -> Result<Self, (PathBuf, io::Error)> {
        let path = parent.join(&name);
        match fs::symlink_metadata(&path) {
            Ok(metadata) => Ok(Self {
                name,
                path,
                kind: metadata.file_type().into(),
            }),
            Err(e) => Err((path, e)),
        }
    }
}

/// Names of a directory's entries plus any errors hit while listing.
struct Listing {
    names: Vec<OsString>,
    errors: Vec<io::Error>,
}

/// List a directory. The handle is closed when this returns.
fn read_listing(dir: &Path) -> io::Result<Listing> {
    let mut listing = Listing {
        names: Vec::new(),
        errors: Vec::new(),
    };

    for entry in fs::read_dir(dir)? {
        match entry {
            Ok(entry) => listing.names.push(entry.file_name()),
            Err(e) => listing.errors.push(e),
        }
    }

    Ok(listing)
}

/// Count lines under `root`.
///
/// # Examples
///
/// ```no_run
/// use linebolt::config::ScanConfig;
/// use linebolt::walker::scan;
/// use std::path::Path;
///
/// let result = scan(Path::new("."), &ScanConfig::default()).unwrap();
/// println!("{} lines in {} files", result.total, result.file_count());
/// ```
pub fn scan(root: &Path, config: &ScanConfig) -> Result<ScanResult, WalkError> {
    scan_with_observer(root, config, &mut ())
}

/// Count lines under `root`, reporting each counted file and each issue to
/// `observer` as it happens.
pub fn scan_with_observer(
    root: &Path,
    config: &ScanConfig,
    observer: &mut dyn ScanObserver,
) -> Result<ScanResult, WalkError> {
    let mut traversal = Traversal {
        classifier: config.classifier(),
        dir_filter: config.directory_filter(),
        sort_entries: config.sort_entries,
        result: ScanResult::default(),
        observer,
    };

    let mut stack = vec![root.to_path_buf()];
    let mut at_root = true;

    while let Some(dir) = stack.pop() {
        let listing = match read_listing(&dir) {
            Ok(listing) => listing,
            Err(e) if at_root => return Err(WalkError::from_io(&dir, e)),
            Err(e) => {
                traversal.report(dir, IssueKind::OpenDirectory, &e);
                continue;
            }
        };
        at_root = false;

        debug!(path = %dir.display(), entries = listing.names.len(), "visiting directory");
        traversal.visit(&dir, listing, &mut stack);
    }

    let result = traversal.result;
    info!(
        files = result.files.len(),
        total = result.total,
        issues = result.issues.len(),
        "scan complete"
    );
    Ok(result)
}

struct Traversal<'a> {
    classifier: FileClassifier,
    dir_filter: DirectoryFilter,
    sort_entries: bool,
    result: ScanResult,
    observer: &'a mut dyn ScanObserver,
}

impl Traversal<'_> {
    fn visit(&mut self, dir: &Path, listing: Listing, stack: &mut Vec<PathBuf>) {
        let Listing { mut names, errors } = listing;

        for error in errors {
            self.report(dir.to_path_buf(), IssueKind::ReadEntry, &error);
        }

        if self.sort_entries {
            names.sort();
        }

        let mut subdirs = Vec::new();

        for name in names {
            let entry = match FileEntry::resolve(dir, name) {
                Ok(entry) => entry,
                Err((path, e)) => {
                    self.report(path, IssueKind::Metadata, &e);
                    continue;
                }
            };

            match entry.kind {
                EntryKind::Directory => {
                    if self.dir_filter.should_skip(&entry.name) {
                        debug!(path = %entry.path.display(), "skipping directory");
                    } else {
                        subdirs.push(entry.path);
                    }
                }
                EntryKind::File => {
                    if self.classifier.accepts(&entry.name) {
                        self.count(entry.path);
                    }
                }
                EntryKind::Other => {}
            }
        }

        // Reversed so the smallest name is popped first.
        if self.sort_entries {
            stack.extend(subdirs.into_iter().rev());
        } else {
            stack.extend(subdirs);
        }
    }

    fn count(&mut self, path: PathBuf) {
        let lines = match count_lines(&path) {
            Ok(lines) => lines,
            Err(e) => {
                self.report(path.clone(), IssueKind::OpenFile, &e);
                0
            }
        };

        let file = FileCount { path, lines };
        self.observer.file_counted(&file);
        self.result.total += lines;
        self.result.files.push(file);
    }

    fn report(&mut self, path: PathBuf, kind: IssueKind, error: &io::Error) {
        warn!(path = %path.display(), error = %error, "{}", kind.describe());

        let issue = ScanIssue {
            path,
            kind,
            message: error.to_string(),
        };
        self.observer.issue(&issue);
        self.result.issues.push(issue);
    }
}
