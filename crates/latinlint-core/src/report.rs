//! Aggregated report, rendering, and the run outcome
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::LintError;
use crate::findings::{PatternMatch, ScanResult};

pub const REPORT_HEADER: &str = "Bad latin found in the following files:";

/// Violations for one run, keyed by absolute path. Holds only files with at
/// least one match; iteration is in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    files: BTreeMap<PathBuf, Vec<PatternMatch>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's result; clean results are dropped.
    pub fn insert(&mut self, result: ScanResult) {
        if !result.is_empty() {
            self.files.insert(result.path, result.matches);
        }
    }

    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &std::path::Path) -> Option<&[PatternMatch]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &[PatternMatch])> {
        self.files.iter().map(|(p, m)| (p, m.as_slice()))
    }

    /// Human-readable failure text, one line per offending file:
    /// `<path>: <pattern> found in line [<line>]`, showing the last matching
    /// pattern in set order. Empty for a clean report.
    pub fn failure_message(&self) -> String {
        let mut out = String::new();
        if self.is_clean() {
            return out;
        }
        out.push_str(REPORT_HEADER);
        out.push('\n');
        for (path, matches) in &self.files {
            if let Some(m) = matches.last() {
                let _ = writeln!(out, "{}: {} found in line [{}]", path.display(), m.pattern, m.line);
            }
        }
        out
    }

    /// Full per-pattern detail as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<ScanResult> for Report {
    fn from_iter<T: IntoIterator<Item = ScanResult>>(iter: T) -> Self {
        let mut report = Report::new();
        for r in iter {
            report.insert(r);
        }
        report
    }
}

/// Result of a lint run as seen at the process boundary.
#[derive(Debug)]
pub enum LintOutcome {
    Passed,
    Violations(Report),
    Failed(LintError),
}

impl LintOutcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LintOutcome::Passed => ExitCode::SUCCESS,
            LintOutcome::Violations(_) => ExitCode::from(1),
            LintOutcome::Failed(_) => ExitCode::from(2),
        }
    }
}

impl From<Result<Report, LintError>> for LintOutcome {
    fn from(res: Result<Report, LintError>) -> Self {
        match res {
            Ok(report) if report.is_clean() => LintOutcome::Passed,
            Ok(report) => LintOutcome::Violations(report),
            Err(e) => LintOutcome::Failed(e),
        }
    }
}
