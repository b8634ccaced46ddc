//! Exclusion filtering for upload candidates.
//!
//! Patterns apply to files only: traversal always descends into every
//! directory, whatever its name matches.

use glob::Pattern;
use std::path::Path;

/// The ordered exclusion patterns of one run.
#[derive(Debug, Clone, Default)]
pub struct ExcludePatterns {
    patterns: Vec<String>,
}

impl ExcludePatterns {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Check whether a file's relative path matches any pattern.
    ///
    /// A pattern matches when it shell-globs against the path's base name,
    /// or when the base name contains the pattern, with leading and
    /// trailing `*` stripped, as a plain substring. A pattern that fails to
    /// parse as a glob silently falls back to the substring check.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        let base = Path::new(relative_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative_path.to_string());

        for pattern in &self.patterns {
            if let Ok(glob) = Pattern::new(pattern) {
                if glob.matches(&base) {
                    return true;
                }
            }
            if base.contains(pattern.trim_matches('*')) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(list: &[&str]) -> ExcludePatterns {
        ExcludePatterns::new(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_glob_matches_base_name() {
        let excludes = patterns(&["*.log"]);

        assert!(excludes.is_excluded("app.log"));
        assert!(excludes.is_excluded("logs/app.log"));
        assert!(!excludes.is_excluded("app.txt"));
    }

    #[test]
    fn test_substring_rule() {
        let excludes = patterns(&["tmp"]);

        assert!(excludes.is_excluded("app.tmp.js"));
        assert!(excludes.is_excluded("tmpfile"));
        assert!(!excludes.is_excluded("main.rs"));
    }

    #[test]
    fn test_wildcards_stripped_for_substring() {
        // "*.log" strips to ".log", so the substring rule also fires.
        let excludes = patterns(&["*.log"]);
        assert!(excludes.is_excluded("app.log"));
        assert!(!excludes.is_excluded("readme.md"));
    }

    #[test]
    fn test_no_pattern_matches() {
        let excludes = patterns(&["*.log", "tmp"]);
        assert!(!excludes.is_excluded("readme.md"));
    }

    #[test]
    fn test_unparsable_glob_falls_back_to_substring() {
        let excludes = patterns(&["["]);

        assert!(excludes.is_excluded("notes[1.txt"));
        assert!(!excludes.is_excluded("notes.txt"));
    }

    #[test]
    fn test_first_match_wins_over_order() {
        let excludes = patterns(&["readme*", "*.log"]);

        assert!(excludes.is_excluded("readme.md"));
        assert!(excludes.is_excluded("app.log"));
    }

    #[test]
    fn test_empty_pattern_list() {
        let excludes = ExcludePatterns::default();
        assert!(!excludes.is_excluded("anything"));
    }
}
