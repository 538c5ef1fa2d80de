//! File and directory filtering.
//!
//! Two small policies drive the walk: a [`FileClassifier`] that decides from a
//! file name whether its lines are counted, and a [`DirectoryFilter`] that
//! decides from a directory name whether the walk descends into it.
//! Both look at base names only, never at full paths.

use std::collections::HashSet;
use std::ffi::OsStr;

/// Suffixes counted when nothing else is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".c", ".h"];

/// Directory names skipped when nothing else is configured.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[".git", ".svn", "build", "bin", "obj", ".vscode"];

/// Normalize an extension to its suffix form (`"c"` -> `".c"`).
///
/// Returns `None` for empty input (or a lone dot).
pub fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim();
    let bare = ext.strip_prefix('.').unwrap_or(ext);
    if bare.is_empty() {
        return None;
    }
    Some(format!(".{bare}"))
}

/// Decides whether a regular file is in scope for counting.
///
/// Matching is a case-sensitive suffix comparison on the base name. The name
/// must be strictly longer than the suffix, so a file literally named `.c`
/// is not counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileClassifier {
    suffixes: Vec<String>,
}

impl FileClassifier {
    /// Build a classifier from a list of suffixes.
    ///
    /// Entries are normalized with [`normalize_extension`]; empty entries and
    /// repeats are dropped, first occurrence wins.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let suffixes = suffixes
            .into_iter()
            .filter_map(|s| normalize_extension(s.as_ref()))
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { suffixes }
    }

    /// Check whether a file with this base name should be counted.
    pub fn accepts(&self, name: impl AsRef<OsStr>) -> bool {
        let name = name.as_ref().as_encoded_bytes();
        self.suffixes.iter().any(|suffix| {
            let suffix = suffix.as_bytes();
            name.len() > suffix.len() && name.ends_with(suffix)
        })
    }

    /// The suffixes this classifier accepts, with leading dots.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

/// Decides whether the walk skips a directory entirely.
///
/// Exact name matches only; a listed name is skipped at any depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFilter {
    names: HashSet<String>,
}

impl DirectoryFilter {
    /// Build a filter from a deny-list of directory names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a directory with this base name should be skipped.
    pub fn should_skip(&self, name: impl AsRef<OsStr>) -> bool {
        match name.as_ref().to_str() {
            Some(name) => self.names.contains(name),
            // Deny-list entries are UTF-8, so a non-UTF-8 name never matches.
            None => false,
        }
    }
}

impl Default for DirectoryFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_DIRS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_c_and_h() {
        let classifier = FileClassifier::default();
        assert!(classifier.accepts("main.c"));
        assert!(classifier.accepts("util.h"));
        assert!(!classifier.accepts("main.rs"));
        assert!(!classifier.accepts("Makefile"));
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        let classifier = FileClassifier::default();
        assert!(!classifier.accepts("MAIN.C"));
        assert!(!classifier.accepts("util.H"));
    }

    #[test]
    fn test_name_must_be_longer_than_suffix() {
        let classifier = FileClassifier::default();
        assert!(!classifier.accepts(".c"));
        assert!(!classifier.accepts("c"));
        assert!(classifier.accepts("a.c"));
    }

    #[test]
    fn test_suffix_must_match_at_end() {
        let classifier = FileClassifier::default();
        assert!(!classifier.accepts("main.c.orig"));
        assert!(!classifier.accepts("main.cc"));
        assert!(!classifier.accepts("mainc"));
    }

    #[test]
    fn test_custom_extensions_are_normalized() {
        let classifier = FileClassifier::new(["rs", ".toml", "", "."]);
        assert_eq!(classifier.suffixes(), &[".rs".to_string(), ".toml".to_string()]);
        assert!(classifier.accepts("lib.rs"));
        assert!(classifier.accepts("Cargo.toml"));
        assert!(!classifier.accepts("main.c"));
    }

    #[test]
    fn test_repeated_extensions_are_kept_once() {
        let classifier = FileClassifier::new(["c", "h", ".c", " c"]);
        assert_eq!(classifier.suffixes(), &[".c".to_string(), ".h".to_string()]);
        assert!(classifier.accepts("main.c"));
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("c"), Some(".c".to_string()));
        assert_eq!(normalize_extension(".c"), Some(".c".to_string()));
        assert_eq!(normalize_extension(" .h "), Some(".h".to_string()));
        assert_eq!(normalize_extension(""), None);
        assert_eq!(normalize_extension("."), None);
    }

    #[test]
    fn test_default_skip_dirs() {
        let filter = DirectoryFilter::default();
        for name in [".git", ".svn", "build", "bin", "obj", ".vscode"] {
            assert!(filter.should_skip(name), "{name} should be skipped");
        }
        assert!(!filter.should_skip("src"));
        assert!(!filter.should_skip("include"));
    }

    #[test]
    fn test_skip_is_exact_match() {
        let filter = DirectoryFilter::default();
        assert!(!filter.should_skip("builds"));
        assert!(!filter.should_skip("Build"));
        assert!(!filter.should_skip("my_build"));
        assert!(!filter.should_skip(".github"));
    }

    #[test]
    fn test_custom_skip_dirs() {
        let filter = DirectoryFilter::new(["target", "node_modules"]);
        assert!(filter.should_skip("target"));
        assert!(!filter.should_skip("build"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.c");
        assert!(FileClassifier::default().accepts(name));
        assert!(!DirectoryFilter::default().should_skip(name));
    }
}
