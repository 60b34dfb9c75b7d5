//! Single-file scanning: lossy UTF-8 read → comment strip → lower-case → match
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::findings::{PatternMatch, ScanResult};
use crate::patterns::PatternSet;
use crate::strip::strip_comments;

/// Outcome of reading one file, used for run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadStatus {
    Read,
    Missing,
    Unreadable,
}

/// Scans files against a shared pattern set. Cheap to clone across threads.
#[derive(Debug, Clone)]
pub struct Scanner {
    patterns: Arc<PatternSet>,
}

impl Scanner {
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns: Arc::new(patterns) }
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Scan one file. Never fails:
    /// - a file that disappeared since discovery yields an empty result;
    /// - other read errors are logged and also yield an empty result;
    /// - undecodable bytes are dropped.
    pub fn scan_file(&self, path: &Path) -> ScanResult {
        self.scan_file_with_status(path).0
    }

    pub(crate) fn scan_file_with_status(&self, path: &Path) -> (ScanResult, ReadStatus) {
        match read_lossy(path) {
            Ok(text) => (self.scan_text(path.to_path_buf(), &text), ReadStatus::Read),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(?path, "file vanished before scan, treating as clean");
                (ScanResult::empty(path.to_path_buf()), ReadStatus::Missing)
            }
            Err(e) => {
                warn!(?path, error = %e, "failed to read file, treating as clean");
                (ScanResult::empty(path.to_path_buf()), ReadStatus::Unreadable)
            }
        }
    }

    /// Scan in-memory text as if it were the contents of `path`.
    pub fn scan_text(&self, path: PathBuf, text: &str) -> ScanResult {
        let normalized = strip_comments(text).to_lowercase();
        let n = self.patterns.len();
        let mut last_line: Vec<Option<&str>> = vec![None; n];
        let mut hits = vec![false; n];

        for line in normalized.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            hits.iter_mut().for_each(|h| *h = false);
            self.patterns.matches_in(line, &mut hits);
            for (idx, hit) in hits.iter().enumerate() {
                if *hit {
                    last_line[idx] = Some(line);
                }
            }
        }

        let matches = last_line
            .into_iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let line = line?;
                let pattern = self.patterns.get(idx)?;
                Some(PatternMatch { pattern: pattern.to_string(), line: line.to_string() })
            })
            .collect();

        ScanResult { path, matches }
    }
}

/// Read a file and keep only the valid UTF-8 runs.
fn read_lossy(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf.utf8_chunks().map(|chunk| chunk.valid()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> Scanner {
        Scanner::new(PatternSet::default_set().unwrap())
    }

    fn scan(text: &str) -> ScanResult {
        scanner().scan_text(PathBuf::from("doc.md"), text)
    }

    fn pairs(r: &ScanResult) -> Vec<(&str, &str)> {
        r.matches.iter().map(|m| (m.pattern.as_str(), m.line.as_str())).collect()
    }

    #[test]
    fn clean_text_has_no_matches() {
        assert!(scan("Nothing to see here.\nSecond line.").is_empty());
    }

    #[test]
    fn reports_lower_cased_line() {
        let r = scan("Use e.g. this method");
        assert_eq!(pairs(&r), vec![("e.g.", "use e.g. this method")]);
    }

    #[test]
    fn match_only_inside_comment_is_ignored() {
        assert!(scan("<!-- e.g. inside comment -->\nClean line").is_empty());
    }

    #[test]
    fn match_inside_and_outside_comment_is_reported() {
        let r = scan("<!-- e.g. hidden -->\nbut e.g. visible");
        assert_eq!(pairs(&r), vec![("e.g.", "but e.g. visible")]);
    }

    #[test]
    fn casing_does_not_matter() {
        for text in ["E.G. upper", "e.G. mixed", "e.g. lower"] {
            let r = scan(text);
            assert_eq!(r.matches.len(), 1, "{text}");
            assert_eq!(r.matches[0].pattern, "e.g.");
        }
    }

    #[test]
    fn last_line_wins_per_pattern() {
        let r = scan("first e.g. one\nmiddle\nsecond e.g. two");
        assert_eq!(pairs(&r), vec![("e.g.", "second e.g. two")]);
    }

    #[test]
    fn each_pattern_tracked_independently_in_set_order() {
        let r = scan("apples etc and more\ne.g. pears\n");
        assert_eq!(pairs(&r), vec![("e.g.", "e.g. pears"), (" etc", "apples etc and more")]);
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let r = scan("one\r\nsay i.e. this\r\n");
        assert_eq!(pairs(&r), vec![("i.e.", "say i.e. this")]);
    }

    #[test]
    fn empty_pattern_set_never_matches() {
        let s = Scanner::new(PatternSet::new(Vec::<&str>::new()).unwrap());
        assert!(s.scan_text(PathBuf::from("x"), "e.g. etc i.e.").is_empty());
    }

    #[test]
    fn missing_file_is_clean() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.md");
        let (r, status) = scanner().scan_file_with_status(&path);
        assert!(r.is_empty());
        assert_eq!(status, ReadStatus::Missing);
    }

    #[test]
    fn invalid_utf8_bytes_are_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.md");
        fs::write(&path, b"e.\xffg. split\nuse e.g\xfe. here\n").unwrap();
        let r = scanner().scan_file(&path);
        assert_eq!(pairs(&r), vec![("e.g.", "use e.g. here")]);
    }
}
