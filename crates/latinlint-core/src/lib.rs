//! Documentation linter core
//!
//! Flags Latin abbreviations ("e.g.", "i.e.", "etc", ...) in documentation
//! files:
//! - HTML comments are stripped before matching, so phrases inside `<!-- -->` never count.
//! - Matching is case-insensitive literal containment against a configurable phrase list.
//! - Files come from a full directory walk or from a changed-file provider (e.g. a pull request).
//! - Per-file read problems never abort a run; all violations are reported together.

mod config;
mod discovery;
mod error;
mod findings;
mod lint;
mod options;
mod patterns;
mod provider;
mod report;
mod scanner;
mod strip;

pub use config::{ConfigError, GitHubConfig, LintConfig, DEFAULT_CONFIG_FILE};
pub use discovery::{Discovered, Discovery};
pub use error::LintError;
pub use findings::{PatternMatch, ScanResult};
pub use lint::run_lint;
pub use options::{LintOptions, LintStats};
pub use patterns::{PatternError, PatternSet, DEFAULT_PATTERNS};
pub use provider::{ChangedFiles, FileList, GitHubPullRequest, ProviderError};
pub use report::{LintOutcome, Report, REPORT_HEADER};
pub use scanner::Scanner;
pub use strip::strip_comments;
