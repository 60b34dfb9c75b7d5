//! Run options and statistics

/// Run options
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Worker threads: None = CPU count, Some(1) = sequential.
    pub threads: Option<usize>,
}

impl LintOptions {
    pub fn sequential() -> Self {
        Self { threads: Some(1) }
    }

    pub(crate) fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Run statistics (for CLI logging)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LintStats {
    pub files_discovered: usize,
    pub files_ignored: usize,
    pub files_scanned: usize,
    /// Discovered but gone by scan time.
    pub files_missing: usize,
    pub files_unreadable: usize,
    pub files_failing: usize,
}
