//! Lint run: discovery → scanning (sequential or parallel) → report
use std::path::PathBuf;
use tracing::info;

use crate::config::LintConfig;
use crate::discovery::Discovery;
use crate::error::LintError;
use crate::findings::ScanResult;
use crate::options::{LintOptions, LintStats};
use crate::report::Report;
use crate::scanner::{ReadStatus, Scanner};

/// Run a complete lint pass.
/// - Discovery errors (provider failure, missing root) abort before any scan.
/// - Per-file problems never abort; every violation is collected.
/// - The report is identical for any thread count.
pub fn run_lint(discovery: &Discovery<'_>, config: &LintConfig, opts: &LintOptions) -> Result<(Report, LintStats), LintError> {
    let scanner = Scanner::new(config.pattern_set()?);
    let found = discovery.discover(&config.ignore)?;

    let mut stats = LintStats { files_discovered: found.files.len() + found.ignored, files_ignored: found.ignored, ..LintStats::default() };

    let threads = opts.effective_threads();
    info!(files = found.files.len(), threads, patterns = scanner.patterns().len(), "starting lint");

    let report = if threads > 1 && found.files.len() > 1 {
        scan_parallel(found.files, &scanner, &mut stats, threads)?
    } else {
        scan_sequential(&found.files, &scanner, &mut stats)
    };

    stats.files_failing = report.len();
    info!(scanned = stats.files_scanned, failing = stats.files_failing, missing = stats.files_missing, "lint finished");
    Ok((report, stats))
}

fn record(stats: &mut LintStats, status: ReadStatus) {
    match status {
        ReadStatus::Read => stats.files_scanned += 1,
        ReadStatus::Missing => stats.files_missing += 1,
        ReadStatus::Unreadable => stats.files_unreadable += 1,
    }
}

fn scan_sequential(files: &[PathBuf], scanner: &Scanner, stats: &mut LintStats) -> Report {
    let mut report = Report::new();
    for path in files {
        let (result, status) = scanner.scan_file_with_status(path);
        record(stats, status);
        report.insert(result);
    }
    report
}

/// Workers on a rayon pool send results over a channel; this thread is the
/// only writer to the report.
fn scan_parallel(files: Vec<PathBuf>, scanner: &Scanner, stats: &mut LintStats, threads: usize) -> Result<Report, LintError> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let (tx, rx) = channel::bounded::<(ScanResult, ReadStatus)>(256);
    let worker_scanner = scanner.clone();

    let scan_thread = std::thread::spawn(move || {
        pool.install(|| {
            files.par_iter().for_each_with(tx, |tx, path| {
                let _ = tx.send(worker_scanner.scan_file_with_status(path));
            });
        });
        // all senders dropped here, which closes the channel
    });

    let mut report = Report::new();
    while let Ok((result, status)) = rx.recv() {
        record(stats, status);
        report.insert(result);
    }

    scan_thread.join().map_err(|_| LintError::WorkerPanicked)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChangedFiles, ProviderError};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixed(Vec<String>);

    impl ChangedFiles for Fixed {
        fn changed_files(&self, _change_id: &str) -> Result<Vec<String>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    fn full_tree(root: &Path, cfg: &LintConfig) -> Discovery<'static> {
        Discovery::FullTree { root: root.to_path_buf(), exclude_extensions: cfg.exclude_extensions.clone() }
    }

    fn docs() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.md"), "Fruit: apples etc and pears\n").unwrap();
        fs::write(dir.path().join("good.md"), "Nothing wrong here.\n").unwrap();
        dir
    }

    #[test]
    fn one_dirty_file_one_entry() {
        let dir = docs();
        let cfg = LintConfig::default();
        let (report, stats) = run_lint(&full_tree(dir.path(), &cfg), &cfg, &LintOptions::sequential()).unwrap();
        assert_eq!(report.len(), 1);
        let matches = report.get(&dir.path().join("bad.md")).unwrap();
        assert_eq!(matches[0].pattern, " etc");
        assert_eq!(matches[0].line, "fruit: apples etc and pears");
        assert_eq!(stats.files_scanned, 2);
        assert_eq!(stats.files_failing, 1);
    }

    #[test]
    fn ignored_file_is_never_scanned() {
        let dir = docs();
        fs::write(dir.path().join("CHANGES.md"), "e.g. i.e. etc everywhere").unwrap();
        let cfg = LintConfig::default();
        let (report, stats) = run_lint(&full_tree(dir.path(), &cfg), &cfg, &LintOptions::sequential()).unwrap();
        assert!(report.get(&dir.path().join("CHANGES.md")).is_none());
        assert_eq!(stats.files_ignored, 1);
        assert_eq!(stats.files_discovered, 3);
    }

    #[test]
    fn excluded_extensions_are_skipped() {
        let dir = docs();
        fs::write(dir.path().join("script.js"), "// e.g. a comment").unwrap();
        let cfg = LintConfig::default();
        let (report, _) = run_lint(&full_tree(dir.path(), &cfg), &cfg, &LintOptions::sequential()).unwrap();
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn parallel_matches_sequential() {
        let dir = TempDir::new().unwrap();
        for i in 0..40 {
            let body = if i % 3 == 0 { format!("line {i}\nsee e.g. item {i}\n") } else { format!("clean {i}\n") };
            fs::write(dir.path().join(format!("f{i:02}.md")), body).unwrap();
        }
        let cfg = LintConfig::default();
        let d = full_tree(dir.path(), &cfg);
        let (seq, seq_stats) = run_lint(&d, &cfg, &LintOptions::sequential()).unwrap();
        let (par, par_stats) = run_lint(&d, &cfg, &LintOptions { threads: Some(4) }).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq_stats, par_stats);
        assert_eq!(seq.len(), 14);
        assert_eq!(seq.failure_message(), par.failure_message());
    }

    #[test]
    fn empty_changed_list_passes() {
        let provider = Fixed(Vec::new());
        let d = Discovery::Changed { provider: &provider, change_id: "99".into(), base: PathBuf::from("/repo") };
        let (report, stats) = run_lint(&d, &LintConfig::default(), &LintOptions::default()).unwrap();
        assert!(report.is_clean());
        assert_eq!(stats, LintStats::default());
    }

    #[test]
    fn deleted_changed_file_counts_as_missing() {
        let dir = docs();
        let provider = Fixed(vec!["bad.md".into(), "deleted.md".into()]);
        let d = Discovery::Changed { provider: &provider, change_id: "5".into(), base: dir.path().to_path_buf() };
        let (report, stats) = run_lint(&d, &LintConfig::default(), &LintOptions::sequential()).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(stats.files_missing, 1);
        assert_eq!(stats.files_scanned, 1);
    }

    #[test]
    fn changed_files_with_relative_base_are_keyed_absolute() {
        // relative to the test's working directory
        let dir = tempfile::Builder::new().tempdir_in(".").unwrap();
        assert!(dir.path().is_relative());
        fs::write(dir.path().join("bad.md"), "use e.g. this").unwrap();
        let provider = Fixed(vec!["bad.md".into()]);
        let d = Discovery::Changed { provider: &provider, change_id: "1".into(), base: dir.path().to_path_buf() };
        let (report, _) = run_lint(&d, &LintConfig::default(), &LintOptions::sequential()).unwrap();
        let keys: Vec<&PathBuf> = report.iter().map(|(p, _)| p).collect();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].is_absolute(), "{keys:?}");
        assert!(keys[0].components().all(|c| c != std::path::Component::CurDir), "{keys:?}");
        let expected: PathBuf = std::env::current_dir().unwrap().join(dir.path()).join("bad.md").components().collect();
        assert_eq!(keys[0], &expected);
    }

    #[test]
    fn configured_patterns_replace_defaults() {
        let dir = docs();
        fs::write(dir.path().join("viz.md"), "Viz. the point").unwrap();
        let cfg = LintConfig { patterns: vec!["VIZ.".into()], ..LintConfig::default() };
        let (report, _) = run_lint(&full_tree(dir.path(), &cfg), &cfg, &LintOptions::sequential()).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.get(&dir.path().join("viz.md")).unwrap()[0].pattern, "viz.");
    }

    #[test]
    fn invalid_pattern_aborts() {
        let dir = docs();
        let cfg = LintConfig { patterns: vec![String::new()], ..LintConfig::default() };
        assert!(matches!(
            run_lint(&full_tree(dir.path(), &cfg), &cfg, &LintOptions::sequential()),
            Err(LintError::Config(_))
        ));
    }
}
