//! Per-file scan results
use serde::Serialize;
use std::path::PathBuf;

/// One disallowed phrase and the line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub pattern: String,
    /// Lower-cased, comment-stripped line text.
    pub line: String,
}

/// All matches for a single file, in pattern-set order.
///
/// Each pattern keeps exactly one line: the last line in the file containing
/// it. Earlier occurrences of the same pattern are overwritten and never
/// surface in the report. This mirrors the behaviour existing CI setups rely
/// on; recording every line would change the report shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub path: PathBuf,
    pub matches: Vec<PatternMatch>,
}

impl ScanResult {
    pub fn empty(path: PathBuf) -> Self {
        Self { path, matches: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
