//! Disallowed phrase set (Aho-Corasick over lower-cased literals)
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use thiserror::Error;

/// The phrases flagged when no pattern list is configured.
pub const DEFAULT_PATTERNS: &[&str] = &["i.e.", "i.e ", " ie ", "e.g.", "e.g ", "e.t.c.", " etc", "et cetera"];

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern #{index} is empty")]
    Empty { index: usize },
    #[error("pattern {pattern:?} contains a line break")]
    Multiline { pattern: String },
    #[error("failed to build matcher: {0}")]
    Build(#[from] aho_corasick::BuildError),
}

/// Ordered set of literal phrases, matched case-insensitively.
///
/// Patterns are stored lower-cased; text handed to [`PatternSet::matches_in`]
/// is expected to be lower-cased already. Matching is plain substring
/// containment with no word boundaries, so `" etc"` matches `" etcetera"`.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    ac: AhoCorasick,
}

impl PatternSet {
    /// Build the set, keeping the first position of duplicate patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for (index, p) in patterns.into_iter().enumerate() {
            let p = p.as_ref();
            if p.is_empty() {
                return Err(PatternError::Empty { index });
            }
            if p.contains('\n') || p.contains('\r') {
                return Err(PatternError::Multiline { pattern: p.to_string() });
            }
            let lower = p.to_lowercase();
            if !out.contains(&lower) {
                out.push(lower);
            }
        }
        // Standard semantics so overlapping patterns ("e.g." / "e.g ") are all reported
        let ac = AhoCorasickBuilder::new().match_kind(MatchKind::Standard).build(&out)?;
        Ok(Self { patterns: out, ac })
    }

    /// The built-in phrase list.
    pub fn default_set() -> Result<Self, PatternError> {
        Self::new(DEFAULT_PATTERNS)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern text by index (lower-cased).
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.patterns.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Mark in `hits` every pattern index found in `haystack`.
    /// `hits` must be `self.len()` long.
    pub(crate) fn matches_in(&self, haystack: &str, hits: &mut [bool]) {
        if self.patterns.is_empty() {
            return;
        }
        for m in self.ac.find_overlapping_iter(haystack) {
            hits[m.pattern().as_usize()] = true;
        }
    }
}
